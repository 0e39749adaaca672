//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> Dispatcher -> Shell 的端到端场景
//! - 并发上下线与广播的竞态测试

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
        assert_eq!(contracts::DeliveryKind::RealTime.prefix(), "Real-time: ");
        assert_eq!(
            contracts::DeliveryKind::FromStorage.prefix(),
            "Delivered from storage: "
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use contracts::{
        ContractError, Delivery, OverflowPolicy, PresentationShell, Subscriber, SubscriberConfig,
        SubscriberId, SubscriberKind,
    };
    use dispatcher::{create_dispatcher, Admin, Dispatcher, DispatcherError, RecordingShell};

    fn admins(shell: &Arc<RecordingShell>, wiring: &[(&str, bool)]) -> Dispatcher {
        let dispatcher = Dispatcher::new();
        for (id, online) in wiring {
            let admin = Admin::new(*id, *online, shell.clone() as Arc<dyn PresentationShell>);
            dispatcher.register(Arc::new(admin)).unwrap();
        }
        dispatcher
    }

    /// Offline admin gets the event from storage once it reconnects
    #[test]
    fn test_event_reaches_online_and_offline_admins() {
        let shell = Arc::new(RecordingShell::new());
        let dispatcher = admins(&shell, &[("a", false), ("b", true)]);

        dispatcher.raise_event("X ready");

        assert_eq!(
            shell.texts_for("b"),
            vec!["Real-time: New event: X ready".to_string()]
        );
        assert!(shell.texts_for("a").is_empty());
        assert_eq!(dispatcher.get("a").unwrap().pending(), vec!["New event: X ready"]);

        dispatcher.set_online("a", true).unwrap();

        assert_eq!(
            shell.texts_for("a"),
            vec!["Delivered from storage: New event: X ready".to_string()]
        );
        assert!(dispatcher.get("a").unwrap().pending().is_empty());
        assert_eq!(shell.statuses_for("a"), vec![true]);
    }

    #[test]
    fn test_unregistered_admin_misses_later_broadcasts() {
        let shell = Arc::new(RecordingShell::new());
        let dispatcher = admins(&shell, &[("a", true), ("b", true)]);

        dispatcher.broadcast("m1");
        dispatcher.unregister("a").unwrap();
        dispatcher.broadcast("m2");

        assert_eq!(shell.texts_for("a"), vec!["Real-time: m1".to_string()]);
        assert_eq!(
            shell.texts_for("b"),
            vec!["Real-time: m1".to_string(), "Real-time: m2".to_string()]
        );
    }

    #[test]
    fn test_offline_queue_flushes_in_order_once() {
        let shell = Arc::new(RecordingShell::new());
        let dispatcher = admins(&shell, &[("a", false)]);

        for m in ["m1", "m2", "m3"] {
            dispatcher.broadcast(m);
        }
        dispatcher.set_online("a", true).unwrap();
        // Second online is a no-op for the queue but still notifies the shell
        dispatcher.set_online("a", true).unwrap();

        assert_eq!(
            shell.texts_for("a"),
            vec![
                "Delivered from storage: m1".to_string(),
                "Delivered from storage: m2".to_string(),
                "Delivered from storage: m3".to_string(),
            ]
        );
        assert_eq!(shell.statuses_for("a"), vec![true, true]);
    }

    #[test]
    fn test_offline_twice_keeps_queue() {
        let shell = Arc::new(RecordingShell::new());
        let dispatcher = admins(&shell, &[("a", false)]);

        dispatcher.broadcast("m1");
        dispatcher.set_online("a", false).unwrap();
        dispatcher.set_online("a", false).unwrap();

        assert_eq!(dispatcher.get("a").unwrap().pending(), vec!["m1"]);
        assert!(shell.deliveries().is_empty());
        assert_eq!(shell.statuses_for("a"), vec![false, false]);
    }

    #[test]
    fn test_failing_shell_does_not_stop_fanout() {
        let shell = Arc::new(RecordingShell::failing_for(["b"]));
        let dispatcher = admins(&shell, &[("a", true), ("b", true), ("c", true)]);

        let report = dispatcher.broadcast("m");

        assert_eq!(report.attempted, 3);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failures, vec![SubscriberId::from("b")]);
        assert_eq!(shell.texts_for("a"), vec!["Real-time: m".to_string()]);
        assert_eq!(shell.texts_for("c"), vec!["Real-time: m".to_string()]);
    }

    #[test]
    fn test_reject_overflow_counts_as_failure() {
        let shell = Arc::new(RecordingShell::new());
        let mut full = SubscriberConfig::admin("full", false);
        full.pending_capacity = Some(1);
        full.overflow = OverflowPolicy::Reject;

        let dispatcher = create_dispatcher(
            vec![full, SubscriberConfig::admin("b", true)],
            shell.clone() as Arc<dyn PresentationShell>,
        )
        .unwrap();

        assert!(dispatcher.broadcast("m1").is_clean());
        let report = dispatcher.broadcast("m2");

        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures, vec![SubscriberId::from("full")]);
        assert_eq!(dispatcher.metrics().failure_count, 1);
        assert_eq!(dispatcher.get("full").unwrap().pending(), vec!["m1"]);
        assert_eq!(
            shell.texts_for("b"),
            vec!["Real-time: m1".to_string(), "Real-time: m2".to_string()]
        );
    }

    /// Shell that panics on one message and records everything else
    struct PanicOnMessage {
        inner: RecordingShell,
        message: &'static str,
    }

    impl PresentationShell for PanicOnMessage {
        fn on_delivered(&self, delivery: &Delivery) -> Result<(), ContractError> {
            if delivery.message == self.message {
                panic!("cannot render {}", delivery.message);
            }
            self.inner.on_delivered(delivery)
        }

        fn on_status_changed(&self, subscriber: &SubscriberId, online: bool) {
            self.inner.on_status_changed(subscriber, online);
        }
    }

    #[test]
    fn test_reconnect_survives_panicking_shell() {
        let shell = Arc::new(PanicOnMessage {
            inner: RecordingShell::new(),
            message: "m1",
        });
        let dispatcher = Dispatcher::new();
        dispatcher
            .register(Arc::new(Admin::new(
                "a",
                false,
                shell.clone() as Arc<dyn PresentationShell>,
            )))
            .unwrap();

        dispatcher.broadcast("m1");
        dispatcher.broadcast("m2");
        dispatcher.set_online("a", true).unwrap();

        assert!(dispatcher.get("a").unwrap().is_online());
        assert!(dispatcher.get("a").unwrap().pending().is_empty());
        assert_eq!(
            shell.inner.texts_for("a"),
            vec!["Delivered from storage: m2".to_string()]
        );
        assert_eq!(shell.inner.statuses_for("a"), vec![true]);
    }

    #[test]
    fn test_log_subscriber_status_reaches_shell() {
        let shell = Arc::new(RecordingShell::new());
        let mut audit = SubscriberConfig::admin("audit", true);
        audit.kind = SubscriberKind::Log;

        let dispatcher =
            create_dispatcher(vec![audit], shell.clone() as Arc<dyn PresentationShell>).unwrap();

        dispatcher.toggle("audit").unwrap();
        dispatcher.set_online("audit", true).unwrap();

        assert_eq!(shell.statuses_for("audit"), vec![false, true]);
    }

    #[test]
    fn test_empty_dispatcher_broadcast() {
        let dispatcher = Dispatcher::new();
        let report = dispatcher.broadcast("nobody listens");
        assert_eq!(report.attempted, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let shell = Arc::new(RecordingShell::new());
        let dispatcher = admins(&shell, &[("a", true)]);

        let again = Admin::new("a", false, shell.clone() as Arc<dyn PresentationShell>);
        let err = dispatcher.register(Arc::new(again)).unwrap_err();

        assert!(matches!(err, DispatcherError::DuplicateSubscriber { .. }));
        assert!(dispatcher.get("a").unwrap().is_online());
    }

    /// Configuration file -> loader -> dispatcher -> shell
    #[test]
    fn test_config_to_dispatch() {
        let blueprint = config_loader::ConfigLoader::load_from_str(
            r#"
[[subscribers]]
id = "hamid"
online = true

[[subscribers]]
id = "mudassir"
pending_capacity = 2
overflow = "drop_oldest"

[[subscribers]]
id = "audit"
kind = "log"
online = true

[[events]]
name = "report"
description = "Monthly report is ready"
"#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        let shell = Arc::new(RecordingShell::new());
        let dispatcher = create_dispatcher(
            blueprint.subscribers.clone(),
            shell.clone() as Arc<dyn PresentationShell>,
        )
        .unwrap();

        let report = blueprint.event("report").unwrap();
        for _ in 0..3 {
            dispatcher.raise_event(&report.description);
        }
        dispatcher.broadcast("latest");

        // Capacity 2, drop_oldest: only the two newest survive
        assert_eq!(
            dispatcher.get("mudassir").unwrap().pending(),
            vec!["New event: Monthly report is ready", "latest"]
        );
        assert_eq!(shell.texts_for("hamid").len(), 4);
        assert!(shell.texts_for("audit").is_empty());
        assert_eq!(dispatcher.metrics().attempt_count, 12);
    }

    #[test]
    fn test_sample_config_loads() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../notifier.toml");
        let blueprint = config_loader::ConfigLoader::load_from_path(&path).unwrap();

        assert_eq!(blueprint.subscribers.len(), 3);
        assert!(blueprint.event("report").is_some());

        let shell: Arc<dyn PresentationShell> = Arc::new(RecordingShell::new());
        let dispatcher = create_dispatcher(blueprint.subscribers, shell).unwrap();
        assert_eq!(dispatcher.len(), 3);
    }

    #[tokio::test]
    async fn test_dispatcher_shared_across_tasks() {
        let shell = Arc::new(RecordingShell::new());
        let dispatcher = Arc::new(admins(&shell, &[("a", true), ("b", false)]));

        let mut handles = Vec::new();
        for i in 0..8 {
            let dispatcher = dispatcher.clone();
            handles.push(tokio::spawn(async move {
                dispatcher.broadcast(&format!("m{i}"));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(shell.texts_for("a").len(), 8);
        assert_eq!(dispatcher.get("b").unwrap().pending().len(), 8);
    }
}

#[cfg(test)]
mod concurrency_tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use contracts::{PresentationShell, Subscriber};
    use dispatcher::{Admin, Dispatcher, LogSubscriber, RecordingShell};

    const MESSAGES: usize = 200;

    fn message_of(text: &str) -> &str {
        text.strip_prefix("Real-time: ")
            .or_else(|| text.strip_prefix("Delivered from storage: "))
            .unwrap_or(text)
    }

    /// Toggling while broadcasting neither loses nor duplicates a message
    #[test]
    fn test_toggle_race_single_broadcaster() {
        let shell = Arc::new(RecordingShell::new());
        let dispatcher = Dispatcher::new();
        dispatcher
            .register(Arc::new(Admin::new(
                "a",
                false,
                shell.clone() as Arc<dyn PresentationShell>,
            )))
            .unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..MESSAGES {
                    dispatcher.broadcast(&format!("m{i}"));
                }
            });
            s.spawn(|| {
                for _ in 0..101 {
                    dispatcher.toggle("a").unwrap();
                }
            });
        });
        dispatcher.set_online("a", true).unwrap();

        let received: Vec<String> = shell
            .texts_for("a")
            .iter()
            .map(|t| message_of(t).to_string())
            .collect();
        let expected: Vec<String> = (0..MESSAGES).map(|i| format!("m{i}")).collect();

        // Single producer: order is preserved as well
        assert_eq!(received, expected);
        assert!(dispatcher.get("a").unwrap().pending().is_empty());
    }

    /// An even number of concurrent toggles lands back on the start state
    #[test]
    fn test_concurrent_toggles_are_not_lost() {
        let shell = Arc::new(RecordingShell::new());
        let dispatcher = Dispatcher::new();
        dispatcher
            .register(Arc::new(Admin::new(
                "a",
                false,
                shell.clone() as Arc<dyn PresentationShell>,
            )))
            .unwrap();
        dispatcher
            .register(Arc::new(LogSubscriber::new(
                "audit",
                true,
                shell.clone() as Arc<dyn PresentationShell>,
            )))
            .unwrap();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        dispatcher.toggle("a").unwrap();
                        dispatcher.toggle("audit").unwrap();
                    }
                });
            }
        });

        assert!(!dispatcher.get("a").unwrap().is_online());
        assert!(dispatcher.get("audit").unwrap().is_online());
        assert_eq!(shell.statuses_for("a").len(), 200);
        assert_eq!(shell.statuses_for("audit").len(), 200);
    }

    #[test]
    fn test_toggle_race_many_broadcasters() {
        let shell = Arc::new(RecordingShell::new());
        let dispatcher = Dispatcher::new();
        for id in ["a", "b"] {
            dispatcher
                .register(Arc::new(Admin::new(
                    id,
                    false,
                    shell.clone() as Arc<dyn PresentationShell>,
                )))
                .unwrap();
        }

        std::thread::scope(|s| {
            for t in 0..4 {
                let dispatcher = &dispatcher;
                s.spawn(move || {
                    for i in 0..MESSAGES / 4 {
                        dispatcher.broadcast(&format!("t{t}-m{i}"));
                    }
                });
            }
            s.spawn(|| {
                for _ in 0..50 {
                    dispatcher.toggle("a").unwrap();
                    dispatcher.toggle("b").unwrap();
                }
            });
        });
        dispatcher.set_online("a", true).unwrap();
        dispatcher.set_online("b", true).unwrap();

        for id in ["a", "b"] {
            let texts = shell.texts_for(id);
            let unique: HashSet<&str> = texts.iter().map(|t| message_of(t)).collect();
            assert_eq!(texts.len(), MESSAGES, "subscriber {id}");
            assert_eq!(unique.len(), MESSAGES, "subscriber {id}");
        }
    }
}
