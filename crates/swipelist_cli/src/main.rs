//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `swipelist_core` linkage without the Flutter shell.
//! - Replay the delete/undo, archive and delayed-add flows headlessly.

use std::time::Duration;
use swipelist_core::{
    DismissDirection, ListConfig, ListSession, NotificationPresenter, Person,
};

const SETTLE: Duration = Duration::from_millis(10);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("swipelist_core ping={}", swipelist_core::ping());
    println!("swipelist_core version={}", swipelist_core::core_version());

    let config = ListConfig::from_env();
    let session = match ListSession::with_persons(
        config,
        vec![
            Person::new(1, "Bill", 99),
            Person::new(2, "Teddy", 88),
            Person::new(3, "Shelly", 44),
        ],
    ) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("session start failed: {err}");
            std::process::exit(1);
        }
    };
    print_rows("seed", &session);

    match session.controller().dismiss(1, DismissDirection::EndToStart) {
        Ok(_) => print_rows("after delete", &session),
        Err(err) => eprintln!("delete failed: {err}"),
    }
    tokio::time::sleep(SETTLE).await;
    print_notification(&session);
    session.host().perform_action();
    tokio::time::sleep(SETTLE).await;
    print_rows("after undo", &session);

    match session.controller().dismiss(0, DismissDirection::StartToEnd) {
        Ok(_) => print_rows("after archive", &session),
        Err(err) => eprintln!("archive failed: {err}"),
    }
    tokio::time::sleep(SETTLE).await;
    print_notification(&session);
    session.host().dismiss_current();

    if let Err(err) = session.add(Person::new(7, "New", 1)) {
        eprintln!("add failed: {err}");
    }
    print_rows("add scheduled", &session);
    tokio::time::sleep(config.add_delay + SETTLE).await;
    print_rows("after add delay", &session);
}

fn print_rows(label: &str, session: &ListSession) {
    let rows = session
        .store()
        .snapshot()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    println!("{label}: [{}]", rows.join(", "));
}

fn print_notification(session: &ListSession) {
    match session.host().current() {
        Some(visible) => println!(
            "notification: \"{}\" action={}",
            visible.message,
            visible.action_label.as_deref().unwrap_or("-")
        ),
        None => println!("notification: none"),
    }
}
