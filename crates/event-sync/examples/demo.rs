use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use event_sync::*;
use tokio::sync::mpsc;

/// Fetcher that flips from "no streams yet" to "stream assigned" after a few calls.
struct DemoFetcher {
	calls: Mutex<u32>,
}

#[async_trait]
impl EventFetcher for DemoFetcher {
	async fn fetch(&self, event_id: &EventId, update_id: Option<&UpdateId>) -> Result<EventSnapshot, FetchError> {
		let mut calls = self.calls.lock().unwrap();
		*calls += 1;
		println!("fetch #{} for {event_id} (hint: {update_id:?})", *calls);

		let mut snapshot = EventSnapshot::new(event_id.as_str());
		snapshot.title = Some("Season Finals".into());
		if *calls >= 3 {
			snapshot.streams.push(StreamDescriptor::new("s1", Some("https://cdn.example/finals.m3u8".into())));
		}
		Ok(snapshot)
	}
}

struct DemoChannel {
	senders: Mutex<HashMap<EventId, mpsc::Sender<ChannelMessage>>>,
}

impl DemoChannel {
	async fn push(&self, event_id: &EventId, msg: ChannelMessage) {
		let sender = self.senders.lock().unwrap().get(event_id).cloned();
		if let Some(sender) = sender {
			let _ = sender.send(msg).await;
		}
	}
}

#[async_trait]
impl RealtimeChannel for DemoChannel {
	async fn subscribe(&self, event_id: &EventId, session_id: &SessionId) -> Result<mpsc::Receiver<ChannelMessage>, ChannelError> {
		println!("subscribed to {event_id} as {session_id}");
		let (tx, rx) = mpsc::channel(8);
		self.senders.lock().unwrap().insert(event_id.clone(), tx);
		Ok(rx)
	}

	async fn unsubscribe(&self, event_id: &EventId) {
		println!("unsubscribed from {event_id}");
		self.senders.lock().unwrap().remove(event_id);
	}
}

#[tokio::main]
async fn main() {
	let fetcher = Arc::new(DemoFetcher { calls: Mutex::new(0) });
	let channel = Arc::new(DemoChannel { senders: Mutex::new(HashMap::new()) });

	// Short poll interval so the demo shows the fallback quickly.
	let mut sync = EventSynchronizer::new(fetcher, channel.clone(), SyncConfig::with_poll_interval(Duration::from_secs(1)));

	let event_id: EventId = "event-42".into();
	let mut updates = sync.start(event_id.clone(), "demo-session".into());

	tokio::spawn({
		let channel = Arc::clone(&channel);
		let event_id = event_id.clone();
		async move {
			tokio::time::sleep(Duration::from_millis(500)).await;
			channel.push(&event_id, ChannelMessage::ViewerTotal { total: 1337 }).await;
		}
	});

	while let Some(update) = updates.recv().await {
		match update {
			EventUpdate::ViewerCount(total) => println!("viewers: {total}"),
			EventUpdate::Snapshot(snapshot) => {
				println!("snapshot: {} stream(s)", snapshot.streams.len());
				if snapshot.has_streams() {
					// Stream assigned: polling stops, we are done here.
					break;
				}
			}
		}
	}

	sync.stop(&event_id);
	sync.shutdown().await;
}
