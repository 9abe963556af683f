//! # Chat Widget Controller
//!
//! Owns the page-lifetime chat state (resolved IP, consent gate, send phase)
//! and drives the send cycle:
//!
//! ```text
//! Idle --send_message--> Sending { cycle } --reply or failure--> Idle
//! ```
//!
//! Entering `Sending` renders the user's message, disables the send control
//! and shows a loader tagged with the cycle id. Leaving it always removes that
//! loader and re-enables the control, whether the backend answered or not.
//! A second call while `Sending` is rejected with [`SendError::Busy`].

use std::cell::Cell;

use shared::dto::chat::{ChatRequest, ChatResponse};
use shared::utils::normalize_message;
use thiserror::Error;

use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::ports::{Analytics, ChatTransport, ChatView, IpResolver, ThreadStore};
use crate::state::Sender;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending { cycle: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gate {
    /// `boot` not called yet
    Closed,
    AwaitingConsent,
    Open,
}

/// What `boot` did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Startup {
    AwaitingConsent,
    Initialized,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("a message is already being sent")]
    Busy,

    #[error(transparent)]
    Failed(#[from] WidgetError),
}

/// Resolve the visitor's public IP once, falling back on any failure.
pub async fn resolve_user_ip<R: IpResolver>(resolver: &R, fallback: &str) -> String {
    match resolver.resolve().await {
        Ok(ip) => {
            log::debug!("Resolved user IP: {}", ip);
            ip
        }
        Err(e) => {
            log::error!("Error setting user IP: {}. Using fallback {}", e, fallback);
            fallback.to_string()
        }
    }
}

pub struct ChatController<T, S, V, A> {
    config: WidgetConfig,
    user_ip: String,
    in_app: bool,
    transport: T,
    store: S,
    view: V,
    analytics: A,
    phase: Cell<Phase>,
    gate: Cell<Gate>,
    last_cycle: Cell<u64>,
}

impl<T, S, V, A> ChatController<T, S, V, A>
where
    T: ChatTransport,
    S: ThreadStore,
    V: ChatView,
    A: Analytics,
{
    pub fn new(
        config: WidgetConfig,
        user_ip: String,
        transport: T,
        store: S,
        view: V,
        analytics: A,
    ) -> Self {
        Self {
            config,
            user_ip,
            in_app: false,
            transport,
            store,
            view,
            analytics,
            phase: Cell::new(Phase::Idle),
            gate: Cell::new(Gate::Closed),
            last_cycle: Cell::new(0),
        }
    }

    /// Mark the page as running inside the in-app browser
    pub fn with_in_app_browser(mut self, in_app: bool) -> Self {
        self.in_app = in_app;
        self
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.gate.get() == Gate::Open
    }

    /// Page-ready entry point.
    ///
    /// In the in-app browser this only shows the consent overlay; chat starts
    /// from [`acknowledge_consent`](Self::acknowledge_consent).
    pub async fn boot(&self, prompt: Option<String>) -> Startup {
        if self.gate.get() != Gate::Closed {
            log::warn!("Chat widget already booted");
            return if self.is_initialized() {
                Startup::Initialized
            } else {
                Startup::AwaitingConsent
            };
        }

        if self.in_app {
            log::info!("In-app browser detected, waiting for consent");
            self.gate.set(Gate::AwaitingConsent);
            self.view.set_consent_visible(true);
            return Startup::AwaitingConsent;
        }

        self.initialize(prompt).await;
        Startup::Initialized
    }

    /// Consent overlay acknowledged. Returns false when there was nothing to acknowledge.
    pub async fn acknowledge_consent(&self, prompt: Option<String>) -> bool {
        if self.gate.get() != Gate::AwaitingConsent {
            return false;
        }
        self.view.set_consent_visible(false);
        self.initialize(prompt).await;
        true
    }

    /// Message sent automatically on a fresh session, `None` when a thread already exists.
    ///
    /// A non-blank `prompt_message` is sent as given, surrounding whitespace included.
    pub fn first_message(&self, prompt: Option<String>) -> Option<String> {
        if self.store.load().is_some() {
            return None;
        }
        Some(
            prompt
                .filter(|p| normalize_message(p).is_some())
                .unwrap_or_else(|| self.config.default_greeting.clone()),
        )
    }

    async fn initialize(&self, prompt: Option<String>) {
        // The send control works from here on, even while the first message is in flight.
        self.gate.set(Gate::Open);
        log::info!("Chat initialized");

        if let Some(message) = self.first_message(prompt) {
            if let Err(e) = self.send_message(message).await {
                log::warn!("Initial message not delivered: {}", e);
            }
        }
    }

    /// Send-button activation.
    ///
    /// Fires the lead event on every activation, then returns the trimmed
    /// message to send, or `None` for blank input. Does nothing before the
    /// chat is initialized.
    pub fn activate_send(&self, raw_input: &str) -> Option<String> {
        if !self.is_initialized() {
            log::debug!("Send ignored: chat not initialized");
            return None;
        }

        self.analytics.track_lead();

        let message = normalize_message(raw_input)?;
        self.view.scroll_to_bottom();
        Some(message)
    }

    /// Run one send cycle for `message`.
    pub async fn send_message(&self, message: String) -> Result<ChatResponse, SendError> {
        if let Phase::Sending { cycle } = self.phase.get() {
            log::warn!("Send rejected: cycle {} still in flight", cycle);
            return Err(SendError::Busy);
        }

        let cycle = self.last_cycle.get() + 1;
        self.last_cycle.set(cycle);
        self.phase.set(Phase::Sending { cycle });

        self.view.append_message(Sender::User, &message);
        self.view.set_send_enabled(false);
        self.view.show_loader(cycle);

        let stored_thread = self.store.load();
        let request = ChatRequest::new(message, self.user_ip.clone(), stored_thread.clone());

        log::debug!(
            "Cycle {}: posting message (thread: {:?})",
            cycle,
            stored_thread
        );
        let result = self.transport.post_message(&request).await;

        self.view.remove_loader(cycle);
        let outcome = match result {
            Ok(response) => {
                self.view
                    .append_message(Sender::Assistant, &response.assistant_response);
                if stored_thread.is_none() {
                    if let Some(thread_id) = &response.thread_id {
                        log::info!("Conversation thread started: {}", thread_id);
                        self.store.save(thread_id);
                    }
                }
                Ok(response)
            }
            Err(e) => {
                log::error!("Cycle {}: chat request failed: {}", cycle, e);
                self.view.append_error(&self.config.send_failed_message);
                Err(SendError::Failed(e))
            }
        };

        self.view.set_send_enabled(true);
        self.view.scroll_to_bottom();
        self.phase.set(Phase::Idle);

        outcome
    }

    pub fn input_focused(&self) {
        if self.in_app {
            self.view.set_keyboard_padding(self.config.keyboard_offset_px);
            self.view.reveal_container();
        }
    }

    pub fn input_blurred(&self) {
        if self.in_app {
            self.view.set_keyboard_padding(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result as WidgetResult;
    use crate::state::transcript::Transcript;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Event {
        Message(Sender, String),
        Error(String),
        ShowLoader(u64),
        RemoveLoader(u64),
        SendEnabled(bool),
        Scroll,
        Consent(bool),
        Padding(u32),
        Reveal,
        Request(String),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    #[derive(Clone)]
    struct RecordingView {
        log: Log,
        transcript: Rc<RefCell<Transcript>>,
    }

    impl ChatView for RecordingView {
        fn append_message(&self, sender: Sender, text: &str) {
            self.transcript.borrow_mut().push_message(sender, text);
            self.log.borrow_mut().push(Event::Message(sender, text.to_string()));
        }
        fn append_error(&self, text: &str) {
            self.transcript.borrow_mut().push_error(text);
            self.log.borrow_mut().push(Event::Error(text.to_string()));
        }
        fn show_loader(&self, cycle: u64) {
            self.transcript.borrow_mut().show_loader(cycle);
            self.log.borrow_mut().push(Event::ShowLoader(cycle));
        }
        fn remove_loader(&self, cycle: u64) {
            self.transcript.borrow_mut().remove_loader(cycle);
            self.log.borrow_mut().push(Event::RemoveLoader(cycle));
        }
        fn set_send_enabled(&self, enabled: bool) {
            self.log.borrow_mut().push(Event::SendEnabled(enabled));
        }
        fn scroll_to_bottom(&self) {
            self.log.borrow_mut().push(Event::Scroll);
        }
        fn set_consent_visible(&self, visible: bool) {
            self.log.borrow_mut().push(Event::Consent(visible));
        }
        fn set_keyboard_padding(&self, px: u32) {
            self.log.borrow_mut().push(Event::Padding(px));
        }
        fn reveal_container(&self) {
            self.log.borrow_mut().push(Event::Reveal);
        }
    }

    #[derive(Clone)]
    struct FakeTransport {
        log: Log,
        replies: Rc<RefCell<VecDeque<WidgetResult<ChatResponse>>>>,
        requests: Rc<RefCell<Vec<ChatRequest>>>,
        yield_first: bool,
    }

    #[async_trait(?Send)]
    impl ChatTransport for FakeTransport {
        async fn post_message(&self, request: &ChatRequest) -> WidgetResult<ChatResponse> {
            self.log
                .borrow_mut()
                .push(Event::Request(request.message.clone()));
            self.requests.borrow_mut().push(request.clone());
            if self.yield_first {
                tokio::task::yield_now().await;
            }
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(WidgetError::Network("no scripted reply".to_string())))
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStore {
        thread: Rc<RefCell<Option<String>>>,
        saves: Rc<Cell<u32>>,
    }

    impl ThreadStore for MemoryStore {
        fn load(&self) -> Option<String> {
            self.thread.borrow().clone()
        }
        fn save(&self, thread_id: &str) {
            self.saves.set(self.saves.get() + 1);
            *self.thread.borrow_mut() = Some(thread_id.to_string());
        }
    }

    #[derive(Clone, Default)]
    struct CountingAnalytics {
        leads: Rc<Cell<u32>>,
    }

    impl Analytics for CountingAnalytics {
        fn track_lead(&self) {
            self.leads.set(self.leads.get() + 1);
        }
    }

    struct FailingResolver(WidgetError);

    #[async_trait(?Send)]
    impl IpResolver for FailingResolver {
        async fn resolve(&self) -> WidgetResult<String> {
            Err(self.0.clone())
        }
    }

    struct FixedResolver(&'static str);

    #[async_trait(?Send)]
    impl IpResolver for FixedResolver {
        async fn resolve(&self) -> WidgetResult<String> {
            Ok(self.0.to_string())
        }
    }

    type TestController =
        ChatController<FakeTransport, MemoryStore, RecordingView, CountingAnalytics>;

    struct Harness {
        controller: TestController,
        log: Log,
        transcript: Rc<RefCell<Transcript>>,
        transport: FakeTransport,
        store: MemoryStore,
        analytics: CountingAnalytics,
    }

    impl Harness {
        fn new(user_ip: &str) -> Self {
            let log: Log = Rc::default();
            let transcript = Rc::new(RefCell::new(Transcript::new()));
            let view = RecordingView {
                log: log.clone(),
                transcript: transcript.clone(),
            };
            let transport = FakeTransport {
                log: log.clone(),
                replies: Rc::default(),
                requests: Rc::default(),
                yield_first: false,
            };
            let store = MemoryStore::default();
            let analytics = CountingAnalytics::default();
            let controller = ChatController::new(
                WidgetConfig::default(),
                user_ip.to_string(),
                transport.clone(),
                store.clone(),
                view,
                analytics.clone(),
            );
            Self {
                controller,
                log,
                transcript,
                transport,
                store,
                analytics,
            }
        }

        fn in_app(mut self) -> Self {
            self.controller = self.controller.with_in_app_browser(true);
            self
        }

        fn yielding(mut self) -> Self {
            self.transport.yield_first = true;
            self.controller.transport.yield_first = true;
            self
        }

        fn reply(&self, text: &str, thread_id: Option<&str>) {
            self.transport.replies.borrow_mut().push_back(Ok(ChatResponse {
                assistant_response: text.to_string(),
                thread_id: thread_id.map(str::to_string),
            }));
        }

        fn fail(&self, err: WidgetError) {
            self.transport.replies.borrow_mut().push_back(Err(err));
        }

        fn events(&self) -> Vec<Event> {
            self.log.borrow().clone()
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.transport.requests.borrow().clone()
        }
    }

    #[tokio::test]
    async fn test_successful_cycle_renders_one_reply_and_one_loader() {
        let h = Harness::new("203.0.113.7");
        h.reply("Happy to help!", Some("thread_1"));

        let response = h.controller.send_message("Need a quote".to_string()).await.unwrap();
        assert_eq!(response.assistant_response, "Happy to help!");

        let events = h.events();
        let shown = events.iter().filter(|e| matches!(e, Event::ShowLoader(_))).count();
        let removed = events.iter().filter(|e| matches!(e, Event::RemoveLoader(_))).count();
        assert_eq!(shown, 1);
        assert_eq!(removed, 1);

        let transcript = h.transcript.borrow();
        assert_eq!(transcript.loader_count(), 0);
        assert_eq!(transcript.messages_from(Sender::User), vec!["Need a quote"]);
        assert_eq!(transcript.messages_from(Sender::Assistant), vec!["Happy to help!"]);
        assert_eq!(h.controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_cycle_event_order() {
        let h = Harness::new("203.0.113.7");
        h.reply("Sure", None);

        h.controller.send_message("Hi".to_string()).await.unwrap();

        assert_eq!(
            h.events(),
            vec![
                Event::Message(Sender::User, "Hi".to_string()),
                Event::SendEnabled(false),
                Event::ShowLoader(1),
                Event::Request("Hi".to_string()),
                Event::RemoveLoader(1),
                Event::Message(Sender::Assistant, "Sure".to_string()),
                Event::SendEnabled(true),
                Event::Scroll,
            ]
        );
    }

    #[tokio::test]
    async fn test_send_control_disabled_while_outstanding_and_reenabled_once() {
        let h = Harness::new("203.0.113.7");
        h.reply("one", None);
        h.fail(WidgetError::Status(502));

        h.controller.send_message("first".to_string()).await.unwrap();
        let _ = h.controller.send_message("second".to_string()).await;

        let events = h.events();
        for (i, event) in events.iter().enumerate() {
            if let Event::Request(_) = event {
                let last_toggle = events[..i]
                    .iter()
                    .rev()
                    .find_map(|e| match e {
                        Event::SendEnabled(enabled) => Some(*enabled),
                        _ => None,
                    });
                assert_eq!(last_toggle, Some(false), "request dispatched while enabled");
            }
        }

        let enables = events
            .iter()
            .filter(|e| **e == Event::SendEnabled(true))
            .count();
        let disables = events
            .iter()
            .filter(|e| **e == Event::SendEnabled(false))
            .count();
        assert_eq!(enables, 2);
        assert_eq!(disables, 2);
    }

    #[tokio::test]
    async fn test_failure_exit_clears_loader_and_shows_error() {
        let h = Harness::new("203.0.113.7");
        h.fail(WidgetError::Decode("expected value at line 1".to_string()));

        let err = h.controller.send_message("Hello".to_string()).await.unwrap_err();
        assert!(matches!(err, SendError::Failed(WidgetError::Decode(_))));

        let transcript = h.transcript.borrow();
        assert_eq!(transcript.loader_count(), 0);
        assert!(transcript.messages_from(Sender::Assistant).is_empty());
        assert!(h
            .events()
            .contains(&Event::Error(WidgetConfig::default().send_failed_message)));
        assert_eq!(h.events().last(), Some(&Event::Scroll));
        assert_eq!(h.controller.phase(), Phase::Idle);
        assert_eq!(h.store.load(), None);
    }

    #[tokio::test]
    async fn test_thread_id_persisted_once_and_reused() {
        let h = Harness::new("203.0.113.7");
        h.reply("first", Some("thread_a"));
        h.reply("second", Some("thread_b"));
        h.reply("third", None);

        h.controller.send_message("one".to_string()).await.unwrap();
        h.controller.send_message("two".to_string()).await.unwrap();
        h.controller.send_message("three".to_string()).await.unwrap();

        assert_eq!(h.store.saves.get(), 1);
        assert_eq!(h.store.load(), Some("thread_a".to_string()));

        let threads: Vec<Option<String>> =
            h.requests().into_iter().map(|r| r.thread_id).collect();
        assert_eq!(
            threads,
            vec![None, Some("thread_a".to_string()), Some("thread_a".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failed_first_send_does_not_persist_thread() {
        let h = Harness::new("203.0.113.7");
        h.fail(WidgetError::Network("offline".to_string()));
        h.reply("back online", Some("thread_late"));

        let _ = h.controller.send_message("one".to_string()).await;
        h.controller.send_message("two".to_string()).await.unwrap();

        assert_eq!(h.store.load(), Some("thread_late".to_string()));
        assert_eq!(h.store.saves.get(), 1);
    }

    #[tokio::test]
    async fn test_second_send_while_in_flight_is_rejected() {
        let h = Harness::new("203.0.113.7").yielding();
        h.reply("only reply", None);

        let (first, second) = tokio::join!(
            h.controller.send_message("first".to_string()),
            h.controller.send_message("second".to_string()),
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(SendError::Busy)))
                .count(),
            1
        );
        assert_eq!(h.requests().len(), 1);
        assert_eq!(h.transcript.borrow().messages_from(Sender::User).len(), 1);
        assert_eq!(h.transcript.borrow().loader_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_input_never_sends() {
        let h = Harness::new("203.0.113.7");
        h.controller.boot(None).await;
        let before = h.events().len();
        let requests_before = h.requests().len();

        assert_eq!(h.controller.activate_send("   \t\n"), None);
        assert_eq!(h.controller.activate_send(""), None);

        assert_eq!(h.events().len(), before);
        assert_eq!(h.requests().len(), requests_before);
    }

    #[tokio::test]
    async fn test_lead_event_fires_on_every_activation() {
        let h = Harness::new("203.0.113.7");
        h.controller.boot(None).await;

        h.controller.activate_send("");
        h.controller.activate_send("  ");
        let message = h.controller.activate_send("  Kitchen remodel  ");

        assert_eq!(message, Some("Kitchen remodel".to_string()));
        assert_eq!(h.analytics.leads.get(), 3);
    }

    #[tokio::test]
    async fn test_activation_before_initialization_is_ignored() {
        let h = Harness::new("203.0.113.7").in_app();
        h.controller.boot(None).await;

        assert_eq!(h.controller.activate_send("hello"), None);
        assert_eq!(h.analytics.leads.get(), 0);
    }

    #[tokio::test]
    async fn test_ip_lookup_failure_uses_fallback_for_every_request() {
        let ip = resolve_user_ip(&FailingResolver(WidgetError::Status(500)), "1.2.3.4").await;
        assert_eq!(ip, "1.2.3.4");

        let h = Harness::new(&ip);
        h.reply("a", Some("t"));
        h.reply("b", None);
        h.controller.send_message("one".to_string()).await.unwrap();
        h.controller.send_message("two".to_string()).await.unwrap();

        assert!(h.requests().iter().all(|r| r.user_ip == "1.2.3.4"));
    }

    #[tokio::test]
    async fn test_ip_lookup_success_is_used() {
        let ip = resolve_user_ip(&FixedResolver("198.51.100.23"), "1.2.3.4").await;
        assert_eq!(ip, "198.51.100.23");
    }

    #[tokio::test]
    async fn test_boot_sends_prompt_message_on_fresh_session() {
        let h = Harness::new("203.0.113.7");
        h.reply("On it", Some("t1"));

        let startup = h.controller.boot(Some("Need a quote".to_string())).await;

        assert_eq!(startup, Startup::Initialized);
        assert_eq!(h.requests()[0].message, "Need a quote");
    }

    #[tokio::test]
    async fn test_boot_sends_default_greeting_without_prompt() {
        let h = Harness::new("203.0.113.7");
        h.reply("Hi there", Some("t1"));

        h.controller.boot(None).await;

        assert_eq!(
            h.requests()[0].message,
            "Hello Samm, I need help with my renovation project."
        );
    }

    #[tokio::test]
    async fn test_boot_with_existing_thread_sends_nothing() {
        let h = Harness::new("203.0.113.7");
        h.store.save("thread_existing");

        h.controller.boot(Some("Need a quote".to_string())).await;

        assert!(h.requests().is_empty());
        assert!(h.controller.is_initialized());
    }

    #[tokio::test]
    async fn test_in_app_browser_defers_until_consent() {
        let h = Harness::new("203.0.113.7").in_app();
        h.reply("Welcome", Some("t1"));

        let startup = h.controller.boot(None).await;
        assert_eq!(startup, Startup::AwaitingConsent);
        assert!(h.requests().is_empty());
        assert!(!h.controller.is_initialized());
        assert_eq!(h.events(), vec![Event::Consent(true)]);

        assert!(h.controller.acknowledge_consent(None).await);
        assert_eq!(h.events()[1], Event::Consent(false));
        assert_eq!(h.requests().len(), 1);
        assert!(h.controller.is_initialized());

        // A second click has nothing left to do
        assert!(!h.controller.acknowledge_consent(None).await);
        assert_eq!(h.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_consent_without_in_app_browser_is_noop() {
        let h = Harness::new("203.0.113.7");
        h.reply("Hi", None);
        h.controller.boot(None).await;

        assert!(!h.controller.acknowledge_consent(None).await);
        assert_eq!(h.requests().len(), 1);
    }

    #[test]
    fn test_keyboard_padding_only_in_app() {
        let h = Harness::new("203.0.113.7");
        h.controller.input_focused();
        h.controller.input_blurred();
        assert!(h.events().is_empty());

        let h = Harness::new("203.0.113.7").in_app();
        h.controller.input_focused();
        h.controller.input_blurred();
        assert_eq!(
            h.events(),
            vec![Event::Padding(400), Event::Reveal, Event::Padding(0)]
        );
    }

    #[test]
    fn test_first_message_treats_blank_prompt_as_absent() {
        let h = Harness::new("203.0.113.7");
        assert_eq!(
            h.controller.first_message(Some("   ".to_string())),
            Some(WidgetConfig::default().default_greeting)
        );
    }

    #[test]
    fn test_first_message_keeps_prompt_untrimmed() {
        let h = Harness::new("203.0.113.7");
        assert_eq!(
            h.controller.first_message(Some("  Need a quote \n".to_string())),
            Some("  Need a quote \n".to_string())
        );
    }
}
