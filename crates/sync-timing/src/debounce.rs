use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
enum DebounceCommand<T> {
	SetDelay(Duration),
	Trigger(T),
}

/// Trailing-edge coalescer: of all values triggered within a continuously
/// refreshed quiet window, only the last one is emitted on the output channel.
///
/// Every [`trigger`](Self::trigger) replaces any value still waiting out its
/// window. A zero delay still goes through the task, so the emission happens on
/// the next cooperative turn, never reentrant-inline.
pub struct Debouncer<T> {
	commands: mpsc::UnboundedSender<DebounceCommand<T>>,
	cancel: CancellationToken,
}

impl<T: Send + 'static> Debouncer<T> {
	/// Spawn the debounce task with an initial quiet window.
	pub fn new(min_delay: Duration) -> (Self, mpsc::Receiver<T>) {
		let (out_tx, out_rx) = mpsc::channel(1);
		let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
		let cancel = CancellationToken::new();

		let task = DebounceTask {
			min_delay,
			commands: cmd_rx,
			out: out_tx,
			cancel: cancel.clone(),
		};
		tokio::spawn(task.run());

		(Self { commands: cmd_tx, cancel }, out_rx)
	}

	/// Reconfigure the quiet window for subsequent triggers.
	pub fn set_delay(&self, min_delay: Duration) {
		let _ = self.commands.send(DebounceCommand::SetDelay(min_delay));
	}

	/// Schedule `value` for emission once the quiet window elapses with no
	/// further triggers. Returns `false` when the debounce task is gone.
	pub fn trigger(&self, value: T) -> bool {
		self.commands.send(DebounceCommand::Trigger(value)).is_ok()
	}

	/// Stop the task; a pending value is discarded.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}
}

impl<T> Drop for Debouncer<T> {
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

struct DebounceTask<T> {
	min_delay: Duration,
	commands: mpsc::UnboundedReceiver<DebounceCommand<T>>,
	out: mpsc::Sender<T>,
	cancel: CancellationToken,
}

impl<T: Send + 'static> DebounceTask<T> {
	async fn run(mut self) {
		let quiet = sleep(Duration::ZERO);
		tokio::pin!(quiet);
		let mut pending: Option<T> = None;

		loop {
			tokio::select! {
				biased;

				_ = self.cancel.cancelled() => break,

				cmd = self.commands.recv() => match cmd {
					None => break,
					Some(DebounceCommand::SetDelay(delay)) => self.min_delay = delay,
					Some(DebounceCommand::Trigger(value)) => {
						if pending.is_some() {
							debug!("superseding pending debounced value");
						}
						pending = Some(value);
						quiet.as_mut().reset(Instant::now() + self.min_delay);
					}
				},

				() = &mut quiet, if pending.is_some() => {
					if let Some(value) = pending.take() {
						if self.out.send(value).await.is_err() {
							break;
						}
					}
				}
			}
		}
	}
}
