//! Quiz session controller.
//!
//! Owns the session state and drives it through
//! `Idle → Loading → Active(i) → Resolved(i) → … → Finished` in response to
//! [`Action`]s. All output goes to a [`QuizView`] as render commands, so the
//! controller runs the same way behind a terminal or in a test.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::entities::decode_entities;
use crate::error::{FetchError, QuizError};
use crate::fallback::{fallback_questions, FALLBACK_NOTICE};
use crate::model::{
    percent, AnswerOption, OptionMark, Phase, Question, QuizSettings, Screen, SessionState,
    SessionSummary,
};
use crate::shuffle::shuffle;
use crate::timer::{format_countdown, is_urgent, TickScheduler, TimerId};
use crate::traits::{QuestionSource, QuizView};

/// Inbound events the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Begin a session from the welcome screen.
    Start,
    /// Choose the option with this text (raw or decoded).
    Select(String),
    /// Advance past a resolved question.
    Next,
    /// Abandon the current session and start a fresh one.
    PlayAgain,
    /// Return to the welcome screen.
    Home,
    /// One countdown second elapsed for the given timer.
    Tick(TimerId),
}

/// How the active question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Correct,
    Incorrect,
    TimedOut,
}

/// The quiz session state machine.
pub struct QuizController<V: QuizView> {
    source: Arc<dyn QuestionSource>,
    view: V,
    scheduler: Box<dyn TickScheduler>,
    settings: QuizSettings,
    rng: StdRng,
    phase: Phase,
    session: Option<SessionState>,
    options: Vec<AnswerOption>,
    active_timer: Option<TimerId>,
    timers_started: u64,
    session_id: Option<Uuid>,
    used_fallback: bool,
    last_resolution: Option<Resolution>,
}

impl<V: QuizView> QuizController<V> {
    pub fn new(source: Arc<dyn QuestionSource>, view: V, scheduler: Box<dyn TickScheduler>) -> Self {
        Self {
            source,
            view,
            scheduler,
            settings: QuizSettings::default(),
            rng: StdRng::from_os_rng(),
            phase: Phase::Idle,
            session: None,
            options: Vec::new(),
            active_timer: None,
            timers_started: 0,
            session_id: None,
            used_fallback: false,
            last_resolution: None,
        }
    }

    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Seed the option shuffle for reproducible sessions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    /// Options for the active question, in display order.
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Raw text of the option displayed at `index`.
    pub fn option_text(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(|o| o.text.as_str())
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The timer currently allowed to tick, if any.
    pub fn active_timer(&self) -> Option<TimerId> {
        self.active_timer
    }

    /// Whether the running session was built from the fallback set.
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub fn last_resolution(&self) -> Option<Resolution> {
        self.last_resolution
    }

    /// The session summary, once the session has finished.
    pub fn summary(&self) -> Option<SessionSummary> {
        match (self.phase, &self.session) {
            (Phase::Finished, Some(session)) => Some(session.summary()),
            _ => None,
        }
    }

    /// Feed one action through the state machine.
    ///
    /// Actions that make no sense in the current phase are ignored.
    pub async fn dispatch(&mut self, action: Action) {
        tracing::trace!(phase = %self.phase, ?action, "dispatch");
        match action {
            Action::Start => {
                if self.phase == Phase::Idle {
                    self.start().await;
                } else {
                    tracing::debug!(phase = %self.phase, "start ignored");
                }
            }
            Action::PlayAgain => self.start().await,
            Action::Select(choice) => self.select(&choice),
            Action::Next => self.next(),
            Action::Home => self.home(),
            Action::Tick(id) => self.tick(id),
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    async fn start(&mut self) {
        self.reset_timer(false);
        self.session = None;
        self.options.clear();
        self.last_resolution = None;
        self.phase = Phase::Loading;
        self.view.show_loading();

        let session_id = Uuid::new_v4();
        self.session_id = Some(session_id);

        let questions = self.load_questions().await;
        if let Err(e) = self.begin_session(questions) {
            tracing::error!(session = %session_id, error = %e, "session start failed");
            self.session = None;
            self.options.clear();
            self.phase = Phase::Idle;
            self.view.show_notice(&e.to_string());
            self.view.show_screen(Screen::Welcome);
        }
    }

    /// Fetch from the source, substituting the fallback set on any failure.
    async fn load_questions(&mut self) -> Vec<Question> {
        let result = match self.source.fetch_questions().await {
            Ok(questions) if questions.is_empty() => Err(FetchError::Empty),
            other => other,
        };

        match result {
            Ok(questions) => {
                self.used_fallback = false;
                tracing::info!(
                    source = self.source.name(),
                    count = questions.len(),
                    "questions loaded"
                );
                questions
            }
            Err(e) => {
                self.used_fallback = true;
                tracing::warn!(
                    source = self.source.name(),
                    error = %e,
                    "question fetch failed, using fallback set"
                );
                self.view.show_notice(FALLBACK_NOTICE);
                fallback_questions()
            }
        }
    }

    fn begin_session(&mut self, questions: Vec<Question>) -> Result<(), QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Startup("no questions available".into()));
        }
        if let Some(pos) = questions.iter().position(|q| q.incorrect_answers.is_empty()) {
            return Err(QuizError::Startup(format!(
                "question {} has no incorrect answers",
                pos + 1
            )));
        }

        tracing::info!(
            session = ?self.session_id,
            questions = questions.len(),
            fallback = self.used_fallback,
            "session started"
        );

        self.session = Some(SessionState::new(questions, self.settings.question_time_secs));
        self.phase = Phase::Active;
        self.view.set_score(0);
        self.view.show_screen(Screen::Active);
        self.present_question();
        Ok(())
    }

    /// Render the active question with freshly shuffled options and start
    /// its countdown.
    fn present_question(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.answer_locked = false;
        session.time_remaining_secs = self.settings.question_time_secs;

        let index = session.current_index;
        let total = session.questions.len();
        let question = &session.questions[index];

        let mut answers = question.answers();
        shuffle(&mut answers, &mut self.rng);
        self.options = answers
            .into_iter()
            .map(|text| AnswerOption {
                display: decode_entities(&text).into_owned(),
                text,
                mark: OptionMark::Neutral,
            })
            .collect();

        let prompt = decode_entities(&question.prompt);
        self.view.render_question(&prompt, &self.options, index, total);
        self.view.set_progress(percent(index, total));
        self.view.enable_next(false);

        self.update_timer_display();
        self.reset_timer(true);
    }

    fn select(&mut self, choice: &str) {
        if self.phase != Phase::Active {
            tracing::debug!(phase = %self.phase, "selection ignored");
            return;
        }
        if self.session.as_ref().is_none_or(|s| s.answer_locked) {
            return;
        }

        let decoded = decode_entities(choice);
        let Some(index) = self
            .options
            .iter()
            .position(|o| o.text == choice || o.display == decoded)
        else {
            tracing::debug!(choice, "selection matches no option");
            return;
        };

        self.resolve(Some(index));
    }

    /// Lock in the outcome for the active question. `chosen` is `None` on
    /// timeout.
    fn resolve(&mut self, chosen: Option<usize>) {
        self.reset_timer(false);

        let points = self.settings.points_per_correct;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.answer_locked {
            return;
        }
        session.answer_locked = true;

        let correct = decode_entities(&session.questions[session.current_index].correct_answer)
            .into_owned();
        let is_correct = chosen.is_some_and(|i| self.options[i].display == correct);

        let resolution = if is_correct {
            session.correct_count += 1;
            session.score += points;
            Resolution::Correct
        } else {
            session.wrong_count += 1;
            if chosen.is_some() {
                Resolution::Incorrect
            } else {
                Resolution::TimedOut
            }
        };
        let score = session.score;
        let question_number = session.current_index + 1;

        self.phase = Phase::Resolved;
        self.last_resolution = Some(resolution);

        if is_correct {
            self.view.set_score(score);
        }
        if let Some(i) = self.options.iter().position(|o| o.display == correct) {
            self.options[i].mark = OptionMark::Correct;
            self.view.mark_option(i, OptionMark::Correct);
        }
        if let Some(i) = chosen.filter(|_| !is_correct) {
            self.options[i].mark = OptionMark::Wrong;
            self.view.mark_option(i, OptionMark::Wrong);
        }
        self.view.enable_next(true);

        tracing::debug!(question = question_number, ?resolution, score, "question resolved");
    }

    fn tick(&mut self, id: TimerId) {
        if self.active_timer != Some(id) || self.phase != Phase::Active {
            tracing::trace!(%id, "stale tick ignored");
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.time_remaining_secs = session.time_remaining_secs.saturating_sub(1);
        let remaining = session.time_remaining_secs;

        self.update_timer_display();
        if remaining == 0 {
            self.resolve(None);
        }
    }

    fn next(&mut self) {
        if self.phase != Phase::Resolved {
            tracing::debug!(phase = %self.phase, "next ignored");
            return;
        }
        self.reset_timer(false);

        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.is_last_question() {
            self.finish();
        } else {
            session.current_index += 1;
            self.phase = Phase::Active;
            self.present_question();
        }
    }

    fn finish(&mut self) {
        let Some(summary) = self.session.as_ref().map(SessionState::summary) else {
            return;
        };
        self.phase = Phase::Finished;
        self.options.clear();
        self.view.show_summary(&summary);
        self.view.show_screen(Screen::Results);

        tracing::info!(
            session = ?self.session_id,
            score = summary.score,
            correct = summary.correct,
            wrong = summary.wrong,
            accuracy = summary.accuracy,
            "session finished"
        );
    }

    fn home(&mut self) {
        self.reset_timer(false);
        self.session = None;
        self.options.clear();
        self.phase = Phase::Idle;
        self.view.show_screen(Screen::Welcome);
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Cancel the running timer, then optionally start a new one. The only
    /// place timers are started or stopped, so at most one is ever live.
    fn reset_timer(&mut self, restart: bool) {
        if let Some(id) = self.active_timer.take() {
            self.scheduler.cancel();
            tracing::trace!(%id, "timer cancelled");
        }
        if restart {
            self.timers_started += 1;
            let id = TimerId(self.timers_started);
            self.scheduler.start(id);
            self.active_timer = Some(id);
        }
    }

    fn update_timer_display(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let remaining = session.time_remaining_secs;
        let urgent = is_urgent(remaining, self.settings.urgent_threshold_secs);
        self.view.set_timer_display(&format_countdown(remaining), urgent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::model::QUESTION_TIME_SECS;
    use crate::timer::ManualTicker;
    use crate::view::{RecordingView, ViewEvent};

    struct StubSource {
        questions: Option<Vec<Question>>,
    }

    #[async_trait]
    impl QuestionSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
            self.questions
                .clone()
                .ok_or_else(|| FetchError::Network("connection refused".into()))
        }
    }

    fn sample_questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                Question::new(
                    &format!("Question {i}?"),
                    &format!("right {i}"),
                    &["wrong a", "wrong b", "wrong c"],
                )
            })
            .collect()
    }

    fn controller(
        questions: Option<Vec<Question>>,
    ) -> (QuizController<RecordingView>, ManualTicker) {
        let ticker = ManualTicker::new();
        let ctrl = QuizController::new(
            Arc::new(StubSource { questions }),
            RecordingView::new(),
            Box::new(ticker.clone()),
        )
        .with_seed(42);
        (ctrl, ticker)
    }

    fn correct_choice(ctrl: &QuizController<RecordingView>) -> String {
        let session = ctrl.session().unwrap();
        let correct = decode_entities(&session.questions[session.current_index].correct_answer);
        ctrl.options()
            .iter()
            .find(|o| o.display == correct)
            .map(|o| o.text.clone())
            .unwrap()
    }

    fn wrong_choice(ctrl: &QuizController<RecordingView>) -> (usize, String) {
        let session = ctrl.session().unwrap();
        let correct = decode_entities(&session.questions[session.current_index].correct_answer);
        ctrl.options()
            .iter()
            .enumerate()
            .find(|(_, o)| o.display != correct)
            .map(|(i, o)| (i, o.text.clone()))
            .unwrap()
    }

    fn correct_index(ctrl: &QuizController<RecordingView>) -> usize {
        let text = correct_choice(ctrl);
        ctrl.options().iter().position(|o| o.text == text).unwrap()
    }

    async fn expire(ctrl: &mut QuizController<RecordingView>) {
        for _ in 0..QUESTION_TIME_SECS {
            let id = ctrl.active_timer().expect("timer should be running");
            ctrl.dispatch(Action::Tick(id)).await;
        }
    }

    #[tokio::test]
    async fn start_renders_first_question() {
        let (mut ctrl, ticker) = controller(Some(sample_questions(3)));
        ctrl.dispatch(Action::Start).await;

        assert_eq!(ctrl.phase(), Phase::Active);
        assert!(!ctrl.used_fallback());
        assert_eq!(ctrl.options().len(), 4);
        assert_eq!(ticker.state().starts, 1);
        assert!(ctrl.active_timer().is_some());

        let events = ctrl.view().events();
        assert_eq!(events[0], ViewEvent::Loading);
        assert!(events.contains(&ViewEvent::Screen(Screen::Active)));
        assert!(events.contains(&ViewEvent::Progress(0)));
        assert_eq!(ctrl.view().last_prompt(), Some("Question 0?"));
        assert_eq!(ctrl.view().last_timer(), Some(("00:30", false)));
    }

    #[tokio::test]
    async fn all_correct_session() {
        let (mut ctrl, _ticker) = controller(Some(sample_questions(5)));
        ctrl.dispatch(Action::Start).await;

        for _ in 0..5 {
            let choice = correct_choice(&ctrl);
            ctrl.dispatch(Action::Select(choice)).await;
            assert_eq!(ctrl.last_resolution(), Some(Resolution::Correct));
            ctrl.dispatch(Action::Next).await;
        }

        assert_eq!(ctrl.phase(), Phase::Finished);
        let summary = ctrl.summary().unwrap();
        assert_eq!(summary.score, 50);
        assert_eq!(summary.correct, 5);
        assert_eq!(summary.wrong, 0);
        assert_eq!(summary.accuracy, 100);
        assert_eq!(ctrl.view().summaries(), vec![summary]);
        assert_eq!(ctrl.view().last_screen(), Some(Screen::Results));
    }

    #[tokio::test]
    async fn fetch_failure_falls_back_with_notice() {
        let (mut ctrl, _ticker) = controller(None);
        ctrl.dispatch(Action::Start).await;

        assert!(ctrl.used_fallback());
        assert_eq!(ctrl.phase(), Phase::Active);
        assert_eq!(ctrl.session().unwrap().questions, fallback_questions());
        assert_eq!(ctrl.view().notices(), vec![FALLBACK_NOTICE]);
    }

    #[tokio::test]
    async fn empty_batch_falls_back() {
        let (mut ctrl, _ticker) = controller(Some(vec![]));
        ctrl.dispatch(Action::Start).await;

        assert!(ctrl.used_fallback());
        assert_eq!(ctrl.session().unwrap().questions.len(), 5);
    }

    #[tokio::test]
    async fn timeout_counts_as_wrong_and_reveals_answer() {
        let (mut ctrl, ticker) = controller(Some(sample_questions(2)));
        ctrl.dispatch(Action::Start).await;
        let expected = correct_index(&ctrl);

        expire(&mut ctrl).await;

        assert_eq!(ctrl.phase(), Phase::Resolved);
        assert_eq!(ctrl.last_resolution(), Some(Resolution::TimedOut));
        let session = ctrl.session().unwrap();
        assert_eq!(session.wrong_count, 1);
        assert_eq!(session.correct_count, 0);
        assert_eq!(session.time_remaining_secs, 0);
        assert_eq!(ctrl.view().marks(), vec![(expected, OptionMark::Correct)]);
        assert_eq!(ctrl.view().last_timer(), Some(("00:00", true)));
        assert_eq!(ticker.active(), None);
        assert_eq!(ctrl.active_timer(), None);
    }

    #[tokio::test]
    async fn timer_turns_urgent_at_threshold() {
        let (mut ctrl, _ticker) = controller(Some(sample_questions(1)));
        ctrl.dispatch(Action::Start).await;

        for _ in 0..24 {
            let id = ctrl.active_timer().unwrap();
            ctrl.dispatch(Action::Tick(id)).await;
        }
        assert_eq!(ctrl.view().last_timer(), Some(("00:06", false)));

        let id = ctrl.active_timer().unwrap();
        ctrl.dispatch(Action::Tick(id)).await;
        assert_eq!(ctrl.view().last_timer(), Some(("00:05", true)));
    }

    #[tokio::test]
    async fn wrong_selection_marks_both_options() {
        let (mut ctrl, _ticker) = controller(Some(sample_questions(1)));
        ctrl.dispatch(Action::Start).await;
        let right = correct_index(&ctrl);
        let (wrong, text) = wrong_choice(&ctrl);

        ctrl.dispatch(Action::Select(text)).await;

        assert_eq!(ctrl.last_resolution(), Some(Resolution::Incorrect));
        assert_eq!(
            ctrl.view().marks(),
            vec![(right, OptionMark::Correct), (wrong, OptionMark::Wrong)]
        );
        assert_eq!(ctrl.options()[wrong].mark, OptionMark::Wrong);
        assert_eq!(ctrl.session().unwrap().score, 0);
        assert!(ctrl.view().events().contains(&ViewEvent::Next(true)));
    }

    #[tokio::test]
    async fn second_resolution_is_a_no_op() {
        let (mut ctrl, _ticker) = controller(Some(sample_questions(2)));
        ctrl.dispatch(Action::Start).await;
        let timer = ctrl.active_timer().unwrap();

        let choice = correct_choice(&ctrl);
        ctrl.dispatch(Action::Select(choice.clone())).await;
        let before = ctrl.session().unwrap().clone();

        let (_, wrong) = wrong_choice(&ctrl);
        ctrl.dispatch(Action::Select(wrong)).await;
        ctrl.dispatch(Action::Select(choice)).await;
        for _ in 0..QUESTION_TIME_SECS {
            ctrl.dispatch(Action::Tick(timer)).await;
        }

        assert_eq!(ctrl.session().unwrap(), &before);
        assert_eq!(ctrl.last_resolution(), Some(Resolution::Correct));
    }

    #[tokio::test]
    async fn selection_after_timeout_is_ignored() {
        let (mut ctrl, _ticker) = controller(Some(sample_questions(1)));
        ctrl.dispatch(Action::Start).await;
        expire(&mut ctrl).await;

        let choice = correct_choice(&ctrl);
        ctrl.dispatch(Action::Select(choice)).await;

        let session = ctrl.session().unwrap();
        assert_eq!(session.correct_count, 0);
        assert_eq!(session.wrong_count, 1);
        assert_eq!(session.score, 0);
    }

    #[tokio::test]
    async fn stale_tick_from_previous_question_is_ignored() {
        let (mut ctrl, ticker) = controller(Some(sample_questions(2)));
        ctrl.dispatch(Action::Start).await;
        let old = ctrl.active_timer().unwrap();

        let choice = correct_choice(&ctrl);
        ctrl.dispatch(Action::Select(choice)).await;
        ctrl.dispatch(Action::Next).await;

        let current = ctrl.active_timer().unwrap();
        assert_ne!(old, current);
        assert_eq!(ticker.active(), Some(current));

        ctrl.dispatch(Action::Tick(old)).await;
        assert_eq!(ctrl.session().unwrap().time_remaining_secs, QUESTION_TIME_SECS);
    }

    #[tokio::test]
    async fn tick_delivered_after_cancel_is_ignored() {
        let (mut ctrl, ticker) = controller(Some(sample_questions(2)));
        ctrl.dispatch(Action::Start).await;
        let in_flight = ctrl.active_timer().unwrap();
        ctrl.dispatch(Action::Tick(in_flight)).await;
        let remaining = ctrl.session().unwrap().time_remaining_secs;

        let choice = correct_choice(&ctrl);
        ctrl.dispatch(Action::Select(choice)).await;
        assert_eq!(ticker.active(), None);

        // The scheduler was cancelled, but a tick it had already queued
        // still arrives.
        ctrl.dispatch(Action::Tick(in_flight)).await;
        assert_eq!(ctrl.phase(), Phase::Resolved);
        assert_eq!(ctrl.session().unwrap().time_remaining_secs, remaining);
        assert_eq!(ctrl.session().unwrap().resolved_count(), 1);
    }

    #[tokio::test]
    async fn entity_encoded_answer_grades_by_decoded_text() {
        let question = Question::new(
            "Which keyword declares a &quot;constant&quot;?",
            "&quot;const&quot;",
            &["&quot;let&quot;", "&quot;static&quot;", "&quot;mut&quot;"],
        );
        let (mut ctrl, _ticker) = controller(Some(vec![question]));
        ctrl.dispatch(Action::Start).await;

        assert_eq!(
            ctrl.view().last_prompt(),
            Some("Which keyword declares a \"constant\"?")
        );
        ctrl.dispatch(Action::Select("\"const\"".into())).await;

        assert_eq!(ctrl.last_resolution(), Some(Resolution::Correct));
        assert_eq!(ctrl.session().unwrap().score, 10);
    }

    #[tokio::test]
    async fn unknown_selection_is_ignored() {
        let (mut ctrl, _ticker) = controller(Some(sample_questions(1)));
        ctrl.dispatch(Action::Start).await;

        ctrl.dispatch(Action::Select("not an option".into())).await;

        assert_eq!(ctrl.phase(), Phase::Active);
        assert_eq!(ctrl.session().unwrap().resolved_count(), 0);
    }

    #[tokio::test]
    async fn next_before_resolution_is_ignored() {
        let (mut ctrl, _ticker) = controller(Some(sample_questions(2)));
        ctrl.dispatch(Action::Start).await;

        ctrl.dispatch(Action::Next).await;

        assert_eq!(ctrl.phase(), Phase::Active);
        assert_eq!(ctrl.session().unwrap().current_index, 0);
    }

    #[tokio::test]
    async fn play_again_resets_and_refetches() {
        let (mut ctrl, _ticker) = controller(Some(sample_questions(5)));
        ctrl.dispatch(Action::Start).await;
        for _ in 0..5 {
            let choice = correct_choice(&ctrl);
            ctrl.dispatch(Action::Select(choice)).await;
            ctrl.dispatch(Action::Next).await;
        }
        assert_eq!(ctrl.phase(), Phase::Finished);

        ctrl.view_mut().clear();
        ctrl.dispatch(Action::PlayAgain).await;

        assert_eq!(ctrl.phase(), Phase::Active);
        let session = ctrl.session().unwrap();
        assert_eq!(session.score, 0);
        assert_eq!(session.correct_count, 0);
        assert_eq!(session.wrong_count, 0);
        assert_eq!(session.current_index, 0);
        assert_eq!(ctrl.view().events()[0], ViewEvent::Loading);
        assert_eq!(ctrl.view().last_prompt(), Some("Question 0?"));
    }

    #[tokio::test]
    async fn play_again_mid_question_cancels_timer() {
        let (mut ctrl, ticker) = controller(Some(sample_questions(3)));
        ctrl.dispatch(Action::Start).await;
        let old = ctrl.active_timer().unwrap();

        ctrl.dispatch(Action::PlayAgain).await;

        let state = ticker.state();
        assert_eq!(state.starts, 2);
        assert_eq!(state.cancels, 1);
        assert_ne!(ctrl.active_timer(), Some(old));
    }

    #[tokio::test]
    async fn home_cancels_timer_without_summary() {
        let (mut ctrl, ticker) = controller(Some(sample_questions(3)));
        ctrl.dispatch(Action::Start).await;
        let old = ctrl.active_timer().unwrap();

        ctrl.dispatch(Action::Home).await;

        assert_eq!(ctrl.phase(), Phase::Idle);
        assert_eq!(ticker.active(), None);
        assert!(ctrl.view().summaries().is_empty());
        assert_eq!(ctrl.view().last_screen(), Some(Screen::Welcome));

        ctrl.dispatch(Action::Tick(old)).await;
        assert_eq!(ctrl.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn start_is_ignored_while_active() {
        let (mut ctrl, ticker) = controller(Some(sample_questions(3)));
        ctrl.dispatch(Action::Start).await;
        ctrl.dispatch(Action::Start).await;

        assert_eq!(ticker.state().starts, 1);
        assert_eq!(ctrl.session().unwrap().current_index, 0);
    }

    #[tokio::test]
    async fn malformed_question_set_is_a_startup_failure() {
        let broken = vec![Question::new("Only one answer?", "yes", &[])];
        let (mut ctrl, ticker) = controller(Some(broken));
        ctrl.dispatch(Action::Start).await;

        assert_eq!(ctrl.phase(), Phase::Idle);
        assert!(ctrl.session().is_none());
        assert_eq!(ticker.state().starts, 0);
        let notices = ctrl.view().notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("could not be started"));
        assert_eq!(ctrl.view().last_screen(), Some(Screen::Welcome));
    }

    #[tokio::test]
    async fn progress_tracks_question_index() {
        let (mut ctrl, _ticker) = controller(Some(sample_questions(4)));
        ctrl.dispatch(Action::Start).await;
        for _ in 0..3 {
            expire(&mut ctrl).await;
            ctrl.dispatch(Action::Next).await;
        }

        let progress: Vec<u32> = ctrl
            .view()
            .events()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![0, 25, 50, 75]);
    }

    #[tokio::test]
    async fn counters_and_score_stay_consistent() {
        let (mut ctrl, _ticker) = controller(Some(sample_questions(10)));
        ctrl.dispatch(Action::Start).await;

        for i in 0..10 {
            match i % 3 {
                0 => {
                    let choice = correct_choice(&ctrl);
                    ctrl.dispatch(Action::Select(choice)).await;
                }
                1 => {
                    let (_, choice) = wrong_choice(&ctrl);
                    ctrl.dispatch(Action::Select(choice)).await;
                }
                _ => expire(&mut ctrl).await,
            }

            let session = ctrl.session().unwrap();
            assert_eq!(session.resolved_count() as usize, session.current_index + 1);
            assert_eq!(session.score, 10 * session.correct_count);
            ctrl.dispatch(Action::Next).await;

            if let Some(session) = ctrl.session().filter(|_| ctrl.phase() == Phase::Active) {
                assert_eq!(session.resolved_count() as usize, session.current_index);
            }
        }

        let summary = ctrl.summary().unwrap();
        assert_eq!(summary.correct, 4);
        assert_eq!(summary.wrong, 6);
        assert_eq!(summary.score, 40);
        assert_eq!(summary.accuracy, 40);
    }

    #[tokio::test]
    async fn custom_settings_apply() {
        let (ctrl, _ticker) = controller(Some(sample_questions(1)));
        let mut ctrl = ctrl.with_settings(QuizSettings {
            question_time_secs: 3,
            points_per_correct: 25,
            urgent_threshold_secs: 1,
        });
        ctrl.dispatch(Action::Start).await;
        assert_eq!(ctrl.view().last_timer(), Some(("00:03", false)));

        let choice = correct_choice(&ctrl);
        ctrl.dispatch(Action::Select(choice)).await;
        assert_eq!(ctrl.session().unwrap().score, 25);
    }
}
