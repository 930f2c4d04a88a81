use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::best::{BestRecord, BestStore, FileBestStore};
use crate::clock::{Clock, SystemClock};
use crate::events::{FinishPayload, ObserverId, Observers, SessionObserver, TickPayload, TokenState};
use crate::input::{self, Applied, Keystroke};
use crate::language::{PoolSource, WordSource};
use crate::metrics::{self, StatsSnapshot};
use crate::samples::{SampleHistory, Sampler, SAMPLE_CAPACITY};
use crate::session::{
    clamp_seed_size, clamp_time_limit, Lifecycle, Mode, Session, TokenOutcome, DEFAULT_SEED_SIZE,
    DEFAULT_TIME_LIMIT, SEPARATOR,
};

/// Construction options for [`Engine`]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub time_limit: u32,
    pub mode: Mode,
    pub seed_size: usize,
    pub word_pool: Option<Vec<String>>,
    pub storage_key: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT,
            mode: Mode::default(),
            seed_size: DEFAULT_SEED_SIZE,
            word_pool: None,
            storage_key: "best".to_string(),
        }
    }
}

/// Typing-session engine: owns one session at a time and scores it.
///
/// The engine never reads the wall clock directly and never spawns timers.
/// Time comes from the injected [`Clock`]; the countdown advances when the
/// caller invokes [`Engine::tick`], and speed sampling catches up on every
/// call into the engine.
pub struct Engine {
    session: Session,
    seed_size: usize,
    source: Box<dyn WordSource>,
    clock: Box<dyn Clock>,
    best_store: Box<dyn BestStore>,
    best: BestRecord,
    sampler: Sampler,
    observers: Observers,
}

impl Engine {
    /// Engine on the system clock, the bundled (or overridden) word pool and
    /// a best record stored under `options.storage_key`.
    pub fn new(options: EngineOptions) -> Self {
        let source = PoolSource::from_pool(options.word_pool.clone());
        let best_store = FileBestStore::for_key(&options.storage_key);
        Self::with_parts(
            options,
            Box::new(source),
            Box::new(SystemClock::new()),
            Box::new(best_store),
        )
    }

    pub fn with_parts(
        options: EngineOptions,
        source: Box<dyn WordSource>,
        clock: Box<dyn Clock>,
        best_store: Box<dyn BestStore>,
    ) -> Self {
        let best = best_store.load();
        let mut engine = Self {
            session: Session::new(options.mode, options.time_limit, Vec::new()),
            seed_size: clamp_seed_size(options.seed_size),
            source,
            clock,
            best_store,
            best,
            sampler: Sampler::default(),
            observers: Observers::default(),
        };
        engine.reset();
        engine
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Discard the current run and start over with fresh words.
    pub fn reset(&mut self) {
        self.sampler.stop();
        let words = self.source.generate(self.session.mode, self.seed_size);
        self.session = Session::new(self.session.mode, self.session.time_limit, words);
        debug!(
            mode = %self.session.mode,
            time_limit = self.session.time_limit,
            words = self.session.words.len(),
            "session reset"
        );
        self.emit_token_state();
    }

    pub fn start(&mut self) {
        if !self.session.is_idle() {
            return;
        }
        let now = self.clock.now();
        self.session.started_at = Some(now);
        self.session.lifecycle = Lifecycle::Running;
        self.sampler.start(now);
        debug!(mode = %self.session.mode, "session started");
        self.observers.start();
    }

    /// Full buffer content for the active token; a trailing separator commits it.
    pub fn submit_input(&mut self, value: &str) {
        self.advance_sampling();
        if self.session.is_finished() {
            return;
        }
        if self.session.is_idle() {
            self.start();
        }

        if input::apply_input(&mut self.session, value) == Applied::Committed {
            self.top_up_words();
        }
        self.emit_token_state();
    }

    pub fn submit_keystroke(&mut self, key: Keystroke) {
        self.advance_sampling();
        if self.session.is_finished() {
            return;
        }

        match key {
            Keystroke::Backspace => {
                self.session.current_input.pop();
                self.emit_token_state();
            }
            Keystroke::Separator => self.commit_buffer(),
            Keystroke::Char(c) if c == SEPARATOR => self.commit_buffer(),
            Keystroke::Char(c) => {
                if self.session.is_idle() {
                    self.start();
                }
                input::push_char(&mut self.session, c);
                self.emit_token_state();
            }
        }
    }

    /// Countdown step, driven by the caller once per second while running.
    pub fn tick(&mut self) {
        self.advance_sampling();
        if !self.session.is_running() {
            return;
        }

        let now = self.clock.now();
        let elapsed = self.session.elapsed_seconds(now);
        let payload = TickPayload {
            time_left: self.session.time_left(now),
            elapsed,
            wpm: metrics::wpm(self.session.correct_chars, elapsed),
        };
        self.observers.tick(&payload);

        if payload.time_left == 0 {
            self.finish();
        }
    }

    /// Stop the run and publish the final scores. Idempotent.
    pub fn finish(&mut self) {
        if self.session.is_finished() {
            return;
        }

        let now = self.clock.now();
        self.sample_until(now);
        self.sampler.stop();

        if let Some(abandoned) = input::abandon_input(&mut self.session) {
            debug!(typed = %abandoned.typed, "uncommitted input recorded without credit");
        }

        if self.session.started_at.is_none() {
            self.session.started_at = Some(now);
        }
        self.session.ended_at = Some(now);
        self.session.lifecycle = Lifecycle::Finished;

        let snapshot = self.stats_snapshot();
        let payload = FinishPayload {
            wpm: snapshot.wpm,
            accuracy: snapshot.accuracy,
            raw_speed: snapshot.raw_speed,
            consistency: snapshot.consistency,
            elapsed: snapshot.elapsed,
            mode: self.session.mode,
            time_limit: self.session.time_limit,
            history: self.session.samples.to_vec(),
        };
        debug!(
            wpm = payload.wpm,
            accuracy = payload.accuracy,
            raw_speed = payload.raw_speed,
            elapsed = payload.elapsed,
            "session finished"
        );
        self.observers.finish(&payload);
        self.record_best(&snapshot);
    }

    /// Switch generation mode; discards the current run.
    pub fn set_mode(&mut self, mode: Mode) {
        self.session.mode = mode;
        self.reset();
    }

    pub fn set_mode_by_name(&mut self, name: &str) {
        self.set_mode(Mode::from_name(name));
    }

    /// Change the time limit (clamped); discards the current run.
    pub fn set_time_limit(&mut self, secs: u32) {
        self.session.time_limit = clamp_time_limit(secs);
        self.reset();
    }

    /// Record speed samples for every interval boundary passed so far.
    pub fn advance_sampling(&mut self) {
        let now = self.clock.now();
        self.sample_until(now);
    }

    pub fn stats_snapshot(&self) -> StatsSnapshot {
        let now = self.clock.now();
        let elapsed = self.session.elapsed_seconds(now);
        StatsSnapshot {
            wpm: metrics::wpm(self.session.correct_chars, elapsed),
            raw_speed: metrics::raw_speed(self.session.typed_chars, elapsed),
            accuracy: self.accuracy(),
            consistency: self.session.samples.consistency(),
            elapsed,
            time_left: self.session.time_left(now),
            typed_chars: self.session.typed_chars,
            correct_chars: self.session.correct_chars,
        }
    }

    pub fn current_token_state(&self) -> TokenState {
        input::token_state(self.session.current_target(), &self.session.current_input)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.session.elapsed_seconds(self.clock.now())
    }

    pub fn accuracy(&self) -> u32 {
        metrics::accuracy(self.session.correct_chars, self.session.typed_chars)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.session.lifecycle
    }

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    pub fn time_limit(&self) -> u32 {
        self.session.time_limit
    }

    pub fn seed_size(&self) -> usize {
        self.seed_size
    }

    pub fn words(&self) -> &[String] {
        &self.session.words
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index
    }

    pub fn current_input(&self) -> &str {
        &self.session.current_input
    }

    pub fn typed_chars(&self) -> usize {
        self.session.typed_chars
    }

    pub fn correct_chars(&self) -> usize {
        self.session.correct_chars
    }

    pub fn token_history(&self) -> &[TokenOutcome] {
        &self.session.token_history
    }

    pub fn samples(&self) -> &SampleHistory {
        &self.session.samples
    }

    pub fn best(&self) -> BestRecord {
        self.best
    }

    fn commit_buffer(&mut self) {
        let mut value = self.session.current_input.clone();
        value.push(SEPARATOR);
        self.submit_input(&value);
    }

    fn top_up_words(&mut self) {
        if self.session.current_index < self.session.words.len() {
            return;
        }
        let more = self.source.generate(self.session.mode, self.seed_size);
        debug!(added = more.len(), "word sequence topped up");
        self.session.words.extend(more);
    }

    fn sample_until(&mut self, now: Duration) {
        if !self.session.is_running() {
            return;
        }
        let Some(started_at) = self.session.started_at else {
            return;
        };

        let due = self.sampler.due(now);
        // older boundaries would be evicted anyway
        let skip = due.len().saturating_sub(SAMPLE_CAPACITY);
        for boundary in due.into_iter().skip(skip) {
            let elapsed = boundary.saturating_sub(started_at).as_secs();
            let wpm = metrics::wpm(self.session.correct_chars, elapsed);
            self.session.samples.push(wpm);
        }
    }

    fn record_best(&mut self, snapshot: &StatsSnapshot) {
        if snapshot.wpm <= self.best.wpm {
            return;
        }
        let record = BestRecord {
            wpm: snapshot.wpm,
            accuracy: snapshot.accuracy,
            raw_speed: snapshot.raw_speed,
        };
        match self.best_store.save(&record) {
            Ok(()) => info!(wpm = record.wpm, previous = self.best.wpm, "new best result"),
            Err(err) => warn!(%err, "failed to persist best result"),
        }
        self.best = record;
    }

    fn emit_token_state(&mut self) {
        let state = self.current_token_state();
        self.observers.token(&state);
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("session", &self.session)
            .field("seed_size", &self.seed_size)
            .field("best", &self.best)
            .field("sampler", &self.sampler)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::best::MemoryBestStore;
    use crate::events::CharState;
    use crate::samples::BASELINE_SAMPLES;
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Seen {
        Start,
        Tick(TickPayload),
        Finish(FinishPayload),
        Token(TokenState),
    }

    #[derive(Clone, Default)]
    struct Recorder {
        seen: Rc<RefCell<Vec<Seen>>>,
    }

    impl Recorder {
        fn count(&self, pred: impl Fn(&Seen) -> bool) -> usize {
            self.seen.borrow().iter().filter(|s| pred(s)).count()
        }

        fn last_token(&self) -> Option<TokenState> {
            self.seen.borrow().iter().rev().find_map(|s| match s {
                Seen::Token(t) => Some(t.clone()),
                _ => None,
            })
        }
    }

    impl SessionObserver for Recorder {
        fn on_start(&mut self) {
            self.seen.borrow_mut().push(Seen::Start);
        }
        fn on_tick(&mut self, tick: &TickPayload) {
            self.seen.borrow_mut().push(Seen::Tick(*tick));
        }
        fn on_finish(&mut self, result: &FinishPayload) {
            self.seen.borrow_mut().push(Seen::Finish(result.clone()));
        }
        fn on_current_token_change(&mut self, token: &TokenState) {
            self.seen.borrow_mut().push(Seen::Token(token.clone()));
        }
    }

    /// Source that repeats a fixed list, so targets are predictable.
    struct Fixed(Vec<&'static str>);

    impl WordSource for Fixed {
        fn generate(&mut self, _mode: Mode, count: usize) -> Vec<String> {
            self.0
                .iter()
                .cycle()
                .take(count)
                .map(|w| w.to_string())
                .collect()
        }
    }

    fn engine_with(
        words: Vec<&'static str>,
        time_limit: u32,
    ) -> (Engine, ManualClock, MemoryBestStore, Recorder) {
        let clock = ManualClock::new();
        let store = MemoryBestStore::new();
        let recorder = Recorder::default();
        let options = EngineOptions {
            time_limit,
            seed_size: 10,
            ..EngineOptions::default()
        };
        let mut engine = Engine::with_parts(
            options,
            Box::new(Fixed(words)),
            Box::new(clock.clone()),
            Box::new(store.clone()),
        );
        engine.subscribe(Box::new(recorder.clone()));
        (engine, clock, store, recorder)
    }

    #[test]
    fn test_new_engine_is_idle_and_seeded() {
        let (engine, _, _, _) = engine_with(vec!["the", "cat"], 60);

        assert_eq!(engine.lifecycle(), Lifecycle::Idle);
        assert_eq!(engine.words().len(), 10);
        assert_eq!(engine.current_index(), 0);
        assert_eq!(engine.samples().len(), BASELINE_SAMPLES);
        assert_eq!(engine.accuracy(), 100);
        assert_eq!(engine.elapsed_seconds(), 0);
    }

    #[test]
    fn test_first_input_starts_session() {
        let (mut engine, clock, _, recorder) = engine_with(vec!["the"], 60);
        clock.advance_secs(5);

        engine.submit_input("t");
        assert_eq!(engine.lifecycle(), Lifecycle::Running);
        assert_eq!(engine.session().started_at, Some(Duration::from_secs(5)));
        assert_eq!(recorder.count(|s| *s == Seen::Start), 1);

        engine.start();
        assert_eq!(recorder.count(|s| *s == Seen::Start), 1);
    }

    #[test]
    fn test_exact_commit() {
        let (mut engine, _, _, recorder) = engine_with(vec!["the", "cat"], 60);

        engine.submit_input("the ");
        assert_eq!(engine.typed_chars(), 4);
        assert_eq!(engine.correct_chars(), 4);
        assert_eq!(engine.current_index(), 1);
        assert!(engine.token_history()[0].is_exact_match);

        let token = recorder.last_token().unwrap();
        assert_eq!(token.target, "cat");
        assert_eq!(token.typed, "");
    }

    #[test]
    fn test_mismatched_commit() {
        let (mut engine, _, _, _) = engine_with(vec!["the"], 60);

        engine.submit_input("teh ");
        assert_eq!(engine.typed_chars(), 4);
        assert_eq!(engine.correct_chars(), 1);
        assert!(!engine.token_history()[0].is_exact_match);
    }

    #[test]
    fn test_buffer_updates_notify_with_char_states() {
        let (mut engine, _, _, recorder) = engine_with(vec!["cat"], 60);

        engine.submit_input("cx");
        let token = recorder.last_token().unwrap();
        assert_eq!(
            token.per_char,
            vec![CharState::Correct, CharState::Incorrect, CharState::Pending]
        );
        assert_eq!(engine.typed_chars(), 2);

        engine.submit_input("c");
        assert_eq!(engine.typed_chars(), 2);
        assert_eq!(engine.current_input(), "c");
    }

    #[test]
    fn test_keystrokes() {
        let (mut engine, _, _, _) = engine_with(vec!["hi", "yo"], 60);

        engine.submit_keystroke(Keystroke::Char('h'));
        assert_eq!(engine.lifecycle(), Lifecycle::Running);
        engine.submit_keystroke(Keystroke::Char('x'));
        engine.submit_keystroke(Keystroke::Backspace);
        assert_eq!(engine.current_input(), "h");
        assert_eq!(engine.typed_chars(), 2);

        engine.submit_keystroke(Keystroke::Char('i'));
        engine.submit_keystroke(Keystroke::Separator);
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.typed_chars(), 4);
        assert_eq!(engine.correct_chars(), 3);
        assert!(engine.token_history()[0].is_exact_match);
    }

    #[test]
    fn test_backspace_on_idle_does_not_start() {
        let (mut engine, _, _, recorder) = engine_with(vec!["hi"], 60);

        engine.submit_keystroke(Keystroke::Backspace);
        assert_eq!(engine.lifecycle(), Lifecycle::Idle);
        assert_eq!(recorder.count(|s| *s == Seen::Start), 0);
    }

    #[test]
    fn test_words_are_topped_up() {
        let (mut engine, _, _, _) = engine_with(vec!["a"], 600);

        for _ in 0..25 {
            engine.submit_input("a ");
            assert!(engine.current_index() < engine.words().len());
        }
        assert_eq!(engine.current_index(), 25);
        assert_eq!(engine.words().len(), 30);
    }

    #[test]
    fn test_tick_counts_down_and_finishes() {
        let (mut engine, clock, store, recorder) = engine_with(vec!["go"], 3);

        engine.tick();
        assert_eq!(recorder.count(|s| matches!(s, Seen::Tick(_))), 0);

        engine.submit_input("go ");
        clock.advance_secs(1);
        engine.tick();
        assert_matches!(
            recorder.seen.borrow().last(),
            Some(Seen::Tick(TickPayload { time_left: 2, elapsed: 1, wpm: 36 }))
        );

        clock.advance_secs(2);
        engine.tick();
        assert_eq!(engine.lifecycle(), Lifecycle::Finished);
        assert_eq!(recorder.count(|s| matches!(s, Seen::Finish(_))), 1);

        // 3 correct chars over 3s
        assert_eq!(store.record().wpm, 12);
        assert_eq!(engine.best().wpm, 12);
    }

    #[test]
    fn test_wpm_over_half_minute() {
        let (mut engine, clock, _, _) = engine_with(vec!["abcd"], 60);

        // 50 exact commits of "abcd " = 250 correct chars
        for _ in 0..50 {
            engine.submit_input("abcd ");
        }
        clock.advance_secs(30);
        let snapshot = engine.stats_snapshot();
        assert_eq!(snapshot.correct_chars, 250);
        assert_eq!(snapshot.elapsed, 30);
        assert_eq!(snapshot.wpm, 100);
        assert_eq!(snapshot.time_left, 30);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let (mut engine, clock, _, recorder) = engine_with(vec!["one"], 60);

        engine.submit_input("on");
        clock.advance_secs(4);
        engine.finish();

        let typed = engine.typed_chars();
        let correct = engine.correct_chars();
        let history = engine.token_history().len();

        clock.advance_secs(10);
        engine.finish();
        engine.submit_input("xyz ");
        engine.submit_keystroke(Keystroke::Char('q'));
        engine.tick();

        assert_eq!(engine.typed_chars(), typed);
        assert_eq!(engine.correct_chars(), correct);
        assert_eq!(engine.token_history().len(), history);
        assert_eq!(engine.elapsed_seconds(), 4);
        assert_eq!(recorder.count(|s| matches!(s, Seen::Finish(_))), 1);
    }

    #[test]
    fn test_finish_flushes_partial_input_without_credit() {
        let (mut engine, clock, _, _) = engine_with(vec!["one", "two"], 60);

        engine.submit_input("one ");
        engine.submit_input("tw");
        clock.advance_secs(2);
        engine.finish();

        assert_eq!(engine.typed_chars(), 6);
        assert_eq!(engine.correct_chars(), 4);
        let last = engine.token_history().last().unwrap();
        assert_eq!(last.target, "two");
        assert_eq!(last.typed, "tw");
        assert_eq!(last.correct_count, 0);
        assert!(engine.current_input().is_empty());
    }

    #[test]
    fn test_finish_payload() {
        let (mut engine, clock, _, recorder) = engine_with(vec!["abcd"], 60);

        engine.submit_input("abcd ");
        clock.advance_secs(2);
        engine.submit_input("abcd ");
        clock.advance_secs(1);
        engine.finish();

        let seen = recorder.seen.borrow();
        let Some(Seen::Finish(result)) = seen.iter().find(|s| matches!(s, Seen::Finish(_))) else {
            panic!("expected a finish notification");
        };
        // 10 correct chars over 3s
        assert_eq!(result.wpm, 40);
        assert_eq!(result.raw_speed, 40);
        assert_eq!(result.accuracy, 100);
        assert_eq!(result.elapsed, 3);
        assert_eq!(result.mode, Mode::Words);
        // baseline, then 1s and 2s polled before the second commit, then 3s
        assert_eq!(result.history, vec![0, 0, 0, 60, 30, 40]);
    }

    #[test]
    fn test_sampling_catches_up_without_ticks() {
        let (mut engine, clock, _, _) = engine_with(vec!["a"], 600);

        engine.submit_input("a");
        clock.advance(Duration::from_millis(4_500));
        engine.advance_sampling();
        assert_eq!(engine.samples().len(), BASELINE_SAMPLES + 4);

        clock.advance_secs(500);
        engine.advance_sampling();
        assert_eq!(engine.samples().len(), SAMPLE_CAPACITY);
    }

    #[test]
    fn test_no_sampling_while_idle() {
        let (mut engine, clock, _, _) = engine_with(vec!["a"], 60);
        clock.advance_secs(10);
        engine.advance_sampling();
        assert_eq!(engine.samples().len(), BASELINE_SAMPLES);
    }

    #[test]
    fn test_set_mode_mid_run_resets() {
        let (mut engine, _, _, _) = engine_with(vec!["a", "b"], 60);

        engine.submit_input("a ");
        assert_eq!(engine.lifecycle(), Lifecycle::Running);

        engine.set_mode(Mode::Numbers);
        assert_eq!(engine.lifecycle(), Lifecycle::Idle);
        assert_eq!(engine.mode(), Mode::Numbers);
        assert_eq!(engine.typed_chars(), 0);
        assert_eq!(engine.current_index(), 0);
        assert!(engine.token_history().is_empty());
    }

    #[test]
    fn test_set_mode_by_unknown_name_falls_back() {
        let (mut engine, _, _, _) = engine_with(vec!["a"], 60);
        engine.set_mode(Mode::Quote);
        engine.set_mode_by_name("hieroglyphs");
        assert_eq!(engine.mode(), Mode::Words);
    }

    #[test]
    fn test_set_time_limit_clamps_and_resets() {
        let (mut engine, _, _, _) = engine_with(vec!["a"], 60);
        engine.submit_input("a ");

        engine.set_time_limit(0);
        assert_eq!(engine.time_limit(), 1);
        assert_eq!(engine.lifecycle(), Lifecycle::Idle);
        assert_eq!(engine.typed_chars(), 0);
    }

    #[test]
    fn test_reset_twice_is_stable() {
        let (mut engine, _, _, _) = engine_with(vec!["a", "b"], 60);
        engine.submit_input("a ");

        engine.reset();
        let first = (
            engine.typed_chars(),
            engine.correct_chars(),
            engine.current_index(),
            engine.samples().to_vec(),
            engine.lifecycle(),
        );
        engine.reset();
        let second = (
            engine.typed_chars(),
            engine.correct_chars(),
            engine.current_index(),
            engine.samples().to_vec(),
            engine.lifecycle(),
        );
        assert_eq!(first, second);
        assert_eq!(first.0, 0);
    }

    #[test]
    fn test_best_only_replaced_when_beaten() {
        let clock = ManualClock::new();
        let store = MemoryBestStore::with_record(BestRecord {
            wpm: 500,
            accuracy: 100,
            raw_speed: 500,
        });
        let mut engine = Engine::with_parts(
            EngineOptions::default(),
            Box::new(Fixed(vec!["x"])),
            Box::new(clock.clone()),
            Box::new(store.clone()),
        );
        assert_eq!(engine.best().wpm, 500);

        engine.submit_input("x ");
        clock.advance_secs(1);
        engine.finish();

        assert_eq!(store.save_count(), 0);
        assert_eq!(engine.best().wpm, 500);
    }

    #[test]
    fn test_unsubscribed_observer_is_silent() {
        let (mut engine, _, _, recorder) = engine_with(vec!["a"], 60);
        let extra = Recorder::default();
        let id = engine.subscribe(Box::new(extra.clone()));

        engine.submit_input("a");
        assert!(engine.unsubscribe(id));
        engine.submit_input("a ");

        assert_eq!(extra.count(|s| matches!(s, Seen::Token(_))), 1);
        assert!(recorder.count(|s| matches!(s, Seen::Token(_))) >= 2);
    }

    #[test]
    fn test_finish_from_idle() {
        let (mut engine, _, store, recorder) = engine_with(vec!["a"], 60);
        engine.finish();

        assert_eq!(engine.lifecycle(), Lifecycle::Finished);
        assert_eq!(engine.stats_snapshot().wpm, 0);
        assert_eq!(recorder.count(|s| matches!(s, Seen::Finish(_))), 1);
        assert_eq!(store.save_count(), 0);
    }
}
