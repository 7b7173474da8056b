use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Marker value delivered on every timer fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

#[derive(Debug)]
enum TimerCommand {
	Suspend,
	Resume,
	Reset,
}

/// A cancellable, suspend/resume-capable periodic trigger.
///
/// The timer is created **suspended**; the first call to [`resume`](Self::resume)
/// arms it. Ticks are delivered on a capacity-1 channel, so fires that land while
/// the consumer is busy coalesce instead of piling up.
///
/// Double-suspend and double-resume are no-ops. Commands sent after
/// [`cancel`](Self::cancel) are silently dropped.
pub struct RepeatingTimer {
	commands: mpsc::UnboundedSender<TimerCommand>,
	cancel: CancellationToken,
}

impl RepeatingTimer {
	/// Spawn the timer task. The timer starts suspended; call `resume()` to arm it.
	pub fn start(period: Duration) -> (Self, mpsc::Receiver<Tick>) {
		let (tick_tx, tick_rx) = mpsc::channel(1);
		let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
		let cancel = CancellationToken::new();

		let task = TimerTask {
			period,
			suspended: true,
			commands: cmd_rx,
			ticks: tick_tx,
			cancel: cancel.clone(),
		};
		tokio::spawn(task.run());

		(Self { commands: cmd_tx, cancel }, tick_rx)
	}

	/// Halt firing without losing configuration. No-op while already suspended.
	pub fn suspend(&self) {
		let _ = self.commands.send(TimerCommand::Suspend);
	}

	/// Restart firing from a fresh interval boundary. No-op while already running.
	pub fn resume(&self) {
		let _ = self.commands.send(TimerCommand::Resume);
	}

	/// Restart the countdown, used when an external source already provided
	/// fresh data. Equivalent to suspend followed by resume: the timer is left
	/// running with a full period ahead of it.
	pub fn reset(&self) {
		let _ = self.commands.send(TimerCommand::Reset);
	}

	/// Permanently stop the timer task.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}
}

impl Drop for RepeatingTimer {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

/// Internal task that owns the ticker state.
struct TimerTask {
	period: Duration,
	suspended: bool,
	commands: mpsc::UnboundedReceiver<TimerCommand>,
	ticks: mpsc::Sender<Tick>,
	cancel: CancellationToken,
}

impl TimerTask {
	async fn run(mut self) {
		let mut ticker = interval_at(Instant::now() + self.period, self.period);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			tokio::select! {
				biased;

				_ = self.cancel.cancelled() => break,

				cmd = self.commands.recv() => match cmd {
					None => break,
					Some(TimerCommand::Suspend) => {
						if !self.suspended {
							self.suspended = true;
							debug!("timer suspended");
						}
					}
					Some(TimerCommand::Resume) => {
						if self.suspended {
							self.suspended = false;
							ticker.reset();
							debug!("timer resumed");
						}
					}
					Some(TimerCommand::Reset) => {
						self.suspended = false;
						ticker.reset();
					}
				},

				_ = ticker.tick(), if !self.suspended => {
					// Capacity-1 channel: a fire that lands while the consumer
					// is still busy with the previous tick is dropped.
					let _ = self.ticks.try_send(Tick);
				}
			}
		}
	}
}
