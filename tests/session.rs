//! End-to-end sessions: plugin-side events, with worker messages executed
//! in-process against real files.

use std::collections::BTreeMap;
use vendorizer::domain::EmailStatus;
use vendorizer::storage::JsonStorage;
use vendorizer::worker::{VendorizerWorker, WorkerMessage};
use vendorizer::{handle_event, initialize, Action, AppState, Config, Event};

struct Session {
    state: AppState,
    worker: VendorizerWorker,
    _dir: tempfile::TempDir,
}

impl Session {
    fn start(extra: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut map: BTreeMap<String, String> = extra
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        map.insert(
            "export_dir".to_string(),
            dir.path().join("exports").display().to_string(),
        );
        map.insert("seed".to_string(), "11".to_string());

        let storage = JsonStorage::new(dir.path().join("vendorizer.json")).unwrap();
        Self {
            state: initialize(&Config::from_zellij(&map)),
            worker: VendorizerWorker::with_storage(Box::new(storage)),
            _dir: dir,
        }
    }

    /// Sends `event` and runs every worker message it produces, feeding the
    /// responses back. Returns the timer delays that were requested.
    fn send(&mut self, event: Event) -> Vec<u64> {
        let mut queue = vec![event];
        let mut timers = Vec::new();
        while let Some(event) = queue.pop() {
            let (_, actions) = handle_event(&mut self.state, &event).unwrap();
            for action in actions {
                match action {
                    Action::PostToWorker(message) => {
                        let response = self.worker.handle_message(message);
                        queue.push(Event::WorkerResponse(response));
                    }
                    Action::ScheduleTimer { delay_ms } => timers.push(delay_ms),
                    Action::CloseFocus => {}
                }
            }
        }
        timers
    }

    fn notice(&self) -> String {
        self.state
            .notice
            .as_ref()
            .map(|n| n.message.clone())
            .unwrap_or_default()
    }
}

#[test]
fn export_writes_filtered_vendors() {
    let mut session = Session::start(&[]);
    session.send(Event::CycleCategory);
    let expected = session.state.filtered.len();
    assert!(expected > 0 && expected < 30);

    session.send(Event::Export);
    let notice = session.notice();
    assert!(notice.starts_with(&format!("Exported {expected} vendors to vendors_")));

    let export_dir = session.state.export_dir.clone();
    let file = std::fs::read_dir(&export_dir)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let contents = std::fs::read_to_string(file).unwrap();
    assert_eq!(contents.lines().count(), expected + 1);
    assert!(contents.starts_with("id,name,category,location,status,type,region,date"));
}

#[test]
fn history_survives_a_restart() {
    let mut session = Session::start(&[("send_delay_ms", "0"), ("success_rate", "100")]);
    session.send(Event::Started);
    assert!(session.state.log_loaded);

    session.send(Event::SendEmail);
    let timers = session.send(Event::Confirm);
    assert_eq!(timers, vec![0]);
    session.send(Event::Tick);
    assert_eq!(session.state.email_log.entries()[0].status, EmailStatus::Success);

    let Session { worker, _dir, .. } = session;
    let mut restarted = Session {
        state: initialize(&Config::default()),
        worker,
        _dir,
    };
    restarted.send(Event::Started);
    assert_eq!(restarted.state.email_log.len(), 1);
    assert_eq!(
        restarted.state.email_log.entries()[0].message,
        "Email sent successfully"
    );

    restarted.send(Event::ToggleHistory);
    restarted.send(Event::ClearHistory);
    restarted.send(Event::Confirm);
    assert!(restarted.state.email_log.is_empty());

    let response = restarted.worker.handle_message(WorkerMessage::load_email_log());
    assert!(format!("{response:?}").contains("entries: []"));
}

#[test]
fn page_size_comes_from_config() {
    let mut session = Session::start(&[("page_size", "25")]);
    assert_eq!(session.state.current_page().items.len(), 25);
    session.send(Event::NextPage);
    assert_eq!(session.state.current_page().range_label(), "26 to 30 of 30");
}
