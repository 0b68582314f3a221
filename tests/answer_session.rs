use std::fs;

use quizrun::error::QuizError;
use quizrun::i18n::{Lang, Messages};
use quizrun::model::{AnswerOption, AnswerPayload, Question, QuestionId, QuestionKind, RunCursor};
use quizrun::parser::parse_quiz;
use quizrun::session::{
    derived_correctness, AnswerSession, Correctness, Draft, Phase, RunView, SessionError,
};
use quizrun::state::{AppState, Dialog, InputMode};
use quizrun::store::{LocalRun, RunStore};

/// Run source that records submissions and only moves when told to.
struct RecordingStore {
    questions: Vec<Question>,
    cursor: RunCursor,
    received: Vec<(QuestionId, AnswerPayload)>,
    reject: bool,
}

impl RecordingStore {
    fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            cursor: RunCursor::default(),
            received: Vec::new(),
            reject: false,
        }
    }

    /// Lands the outcome of the last submission.
    fn land(&mut self, correct: bool) {
        self.cursor.correct.push(correct);
        self.cursor.counter += 1;
    }
}

impl RunStore for RecordingStore {
    fn cursor(&self) -> &RunCursor {
        &self.cursor
    }

    fn questions(&self) -> &[Question] {
        &self.questions
    }

    fn record_answer(
        &mut self,
        question_id: &QuestionId,
        payload: AnswerPayload,
    ) -> Result<(), QuizError> {
        if self.reject {
            return Err(QuizError::RunComplete);
        }
        self.received.push((question_id.clone(), payload));
        Ok(())
    }
}

fn question(number: u32, kind: QuestionKind, options: usize) -> Question {
    Question {
        id: QuestionId::for_number(number),
        number,
        title: format!("Question {}", number),
        kind,
        text: format!("Text of question {}", number),
        answers: (0..options)
            .map(|i| AnswerOption {
                text: format!("option {}", i + 1),
                correct: i == 0,
            })
            .collect(),
        accepted: Vec::new(),
    }
}

fn choices(session: &AnswerSession) -> Vec<bool> {
    match session.draft() {
        Draft::Choices(c) => c.clone(),
        Draft::Text(_) => panic!("expected a choices draft"),
    }
}

#[test]
fn test_single_choice_keeps_at_most_one_selected() {
    let store = RecordingStore::new(vec![question(1, QuestionKind::Single, 4)]);
    let mut session = AnswerSession::new(&store);

    let steps = [(2, true), (0, true), (0, false), (3, true), (1, true), (1, true)];
    for (index, selected) in steps {
        session.select_option(&store, index, selected).unwrap();
        let picked = choices(&session).iter().filter(|c| **c).count();
        assert!(picked <= 1, "{} options selected after {:?}", picked, (index, selected));
    }
    assert_eq!(choices(&session), vec![false, true, false, false]);

    // Unselecting the only selection leaves nothing selected
    session.select_option(&store, 1, false).unwrap();
    assert_eq!(choices(&session), vec![false; 4]);
}

#[test]
fn test_multiple_choice_changes_only_the_given_option() {
    let store = RecordingStore::new(vec![question(1, QuestionKind::Multiple, 4)]);
    let mut session = AnswerSession::new(&store);

    session.select_option(&store, 0, true).unwrap();
    session.select_option(&store, 2, true).unwrap();
    let before = choices(&session);

    session.select_option(&store, 3, true).unwrap();
    let after = choices(&session);
    for i in 0..4 {
        if i != 3 {
            assert_eq!(before[i], after[i], "option {} changed", i);
        }
    }
    assert_eq!(after, vec![true, false, true, true]);

    session.select_option(&store, 0, false).unwrap();
    assert_eq!(choices(&session), vec![false, false, true, true]);
}

#[test]
fn test_draft_is_sized_lazily() {
    let store = RecordingStore::new(vec![question(1, QuestionKind::Multiple, 3)]);
    let mut session = AnswerSession::new(&store);
    assert!(session.draft().is_empty());

    session.toggle_option(&store, 1).unwrap();
    assert_eq!(choices(&session), vec![false, true, false]);
    session.toggle_option(&store, 1).unwrap();
    assert_eq!(choices(&session), vec![false, false, false]);
}

#[test]
fn test_invalid_edits_are_rejected() {
    let store = RecordingStore::new(vec![
        question(1, QuestionKind::Single, 2),
        question(2, QuestionKind::Text, 0),
    ]);
    let mut session = AnswerSession::new(&store);

    assert!(matches!(
        session.select_option(&store, 5, true),
        Err(SessionError::OptionOutOfRange { index: 5, .. })
    ));
    assert!(matches!(
        session.set_text(&store, "hello"),
        Err(SessionError::WrongQuestionKind(_))
    ));
    assert!(matches!(
        session.advance(&store),
        Err(SessionError::NotInFeedback)
    ));
}

#[test]
fn test_active_view_and_single_submission() {
    let mut store = RecordingStore::new(vec![
        question(1, QuestionKind::Single, 3),
        question(2, QuestionKind::Text, 0),
    ]);
    let mut session = AnswerSession::new(&store);

    assert_eq!(session.view(&store), RunView::Active(0));
    assert_eq!(session.current_question(&store).map(|q| q.number), Some(1));

    session.select_option(&store, 0, true).unwrap();
    session.submit(&mut store).unwrap();

    assert_eq!(
        store.received,
        vec![(
            QuestionId::for_number(1),
            AnswerPayload::Choices(vec![true, false, false])
        )]
    );
    assert_eq!(session.phase(), Phase::Feedback { baseline: 0 });
    assert!(session.is_answered());
}

#[test]
fn test_unselected_choices_submit_full_length() {
    let mut store = RecordingStore::new(vec![question(1, QuestionKind::Multiple, 3)]);
    let mut session = AnswerSession::new(&store);

    session.submit(&mut store).unwrap();
    assert_eq!(
        store.received[0].1,
        AnswerPayload::Choices(vec![false, false, false])
    );
}

#[test]
fn test_text_submission_is_verbatim() {
    let mut store = RecordingStore::new(vec![question(1, QuestionKind::Text, 0)]);
    let mut session = AnswerSession::new(&store);

    session.set_text(&store, "abc").unwrap();
    session.submit(&mut store).unwrap();

    assert_eq!(
        store.received,
        vec![(QuestionId::for_number(1), AnswerPayload::Text("abc".to_string()))]
    );
}

#[test]
fn test_completed_view_counts_correct_answers() {
    let mut store = RecordingStore::new(vec![
        question(1, QuestionKind::Single, 2),
        question(2, QuestionKind::Single, 2),
    ]);
    store.cursor = RunCursor {
        counter: 2,
        correct: vec![true, false],
    };
    let session = AnswerSession::new(&store);

    assert_eq!(
        session.view(&store),
        RunView::Completed {
            total: 2,
            correct: 1
        }
    );
    assert!(session.current_question(&store).is_none());
}

#[test]
fn test_counter_past_the_end_renders_nothing() {
    assert_eq!(RunView::select(3, &[true, true], 2), RunView::OutOfRange);
    assert_eq!(RunView::select(0, &[], 0), RunView::Completed { total: 0, correct: 0 });
}

#[test]
fn test_derived_correctness_is_last_entry() {
    assert!(!derived_correctness(&[]));
    assert!(derived_correctness(&[false, true]));
    assert!(!derived_correctness(&[true, true, false]));
}

#[test]
fn test_correctness_is_pending_until_the_store_catches_up() {
    let mut store = RecordingStore::new(vec![
        question(1, QuestionKind::Single, 2),
        question(2, QuestionKind::Single, 2),
    ]);
    let mut session = AnswerSession::new(&store);
    assert_eq!(session.correctness(store.cursor()), None);

    session.select_option(&store, 0, true).unwrap();
    session.submit(&mut store).unwrap();
    assert_eq!(session.correctness(store.cursor()), Some(Correctness::Pending));

    store.land(true);
    assert_eq!(session.correctness(store.cursor()), Some(Correctness::Correct));

    session.advance(&store).unwrap();
    assert_eq!(session.index(), 1);

    // The previous question's result is never shown for the new answer
    session.select_option(&store, 1, true).unwrap();
    session.submit(&mut store).unwrap();
    assert_eq!(session.correctness(store.cursor()), Some(Correctness::Pending));

    store.land(false);
    assert_eq!(session.correctness(store.cursor()), Some(Correctness::Incorrect));
}

#[test]
fn test_feedback_keeps_the_answered_question_on_screen() {
    let mut run = LocalRun::new(vec![
        question(1, QuestionKind::Single, 2),
        question(2, QuestionKind::Text, 0),
    ]);
    let mut session = AnswerSession::new(&run);

    session.select_option(&run, 0, true).unwrap();
    session.submit(&mut run).unwrap();

    // The run moved on, the session still shows question 1 until advanced
    assert_eq!(run.cursor().counter, 1);
    session.sync(&run);
    assert_eq!(session.index(), 0);
    assert_eq!(session.correctness(run.cursor()), Some(Correctness::Correct));

    assert!(matches!(
        session.select_option(&run, 1, true),
        Err(SessionError::NotCollecting)
    ));
}

#[test]
fn test_advance_resets_draft_and_phase_for_every_kind() {
    let mut run = LocalRun::new(vec![
        question(1, QuestionKind::Single, 2),
        question(2, QuestionKind::Multiple, 3),
        question(3, QuestionKind::Text, 0),
    ]);
    let mut session = AnswerSession::new(&run);

    session.select_option(&run, 1, true).unwrap();
    session.submit(&mut run).unwrap();
    session.advance(&run).unwrap();
    assert_eq!(session.phase(), Phase::Collecting);
    assert_eq!(session.draft(), &Draft::Choices(Vec::new()));

    session.select_option(&run, 2, true).unwrap();
    session.submit(&mut run).unwrap();
    session.advance(&run).unwrap();
    assert_eq!(session.phase(), Phase::Collecting);
    assert_eq!(session.draft(), &Draft::Text(String::new()));

    session.set_text(&run, "anything").unwrap();
    session.submit(&mut run).unwrap();
    session.advance(&run).unwrap();
    assert_eq!(session.phase(), Phase::Collecting);
    assert!(session.draft().is_empty());
    assert_eq!(
        session.view(&run),
        RunView::Completed {
            total: 3,
            correct: 1
        }
    );
}

#[test]
fn test_store_error_keeps_collecting() {
    let mut store = RecordingStore::new(vec![question(1, QuestionKind::Text, 0)]);
    store.reject = true;
    let mut session = AnswerSession::new(&store);

    session.set_text(&store, "draft").unwrap();
    let err = session.submit(&mut store).unwrap_err();

    assert!(matches!(err, SessionError::Store(QuizError::RunComplete)));
    assert_eq!(session.phase(), Phase::Collecting);
    assert_eq!(session.draft().text(), "draft");
}

#[test]
fn test_session_follows_cursor_while_collecting() {
    let mut store = RecordingStore::new(vec![
        question(1, QuestionKind::Single, 2),
        question(2, QuestionKind::Text, 0),
    ]);
    let mut session = AnswerSession::new(&store);
    session.select_option(&store, 1, true).unwrap();

    store.land(false);
    session.sync(&store);

    assert_eq!(session.index(), 1);
    assert_eq!(session.draft(), &Draft::Text(String::new()));
}

#[test]
fn test_local_run_over_fixture() {
    let content = fs::read_to_string("fixtures/sample_quiz.md").expect("Cannot read fixture");
    let quiz = parse_quiz(&content).unwrap();
    let mut run = LocalRun::new(quiz.questions);
    let mut session = AnswerSession::new(&run);

    // 1: derivative of x^2 is the second option
    session.select_option(&run, 1, true).unwrap();
    session.submit(&mut run).unwrap();
    session.advance(&run).unwrap();

    // 2: only one of the two continuous functions
    session.select_option(&run, 0, true).unwrap();
    session.submit(&mut run).unwrap();
    assert_eq!(session.correctness(run.cursor()), Some(Correctness::Incorrect));
    session.advance(&run).unwrap();

    // 3: accepted answers ignore case and surrounding space
    session.set_text(&run, "  Euler's Number ").unwrap();
    session.submit(&mut run).unwrap();
    assert_eq!(session.correctness(run.cursor()), Some(Correctness::Correct));
    session.advance(&run).unwrap();

    // 4: no accepted answers, anything non-blank counts
    session.set_text(&run, "compare with a small h").unwrap();
    session.submit(&mut run).unwrap();
    session.advance(&run).unwrap();

    assert!(run.is_complete());
    assert_eq!(run.cursor().correct, vec![true, false, true, true]);
    assert_eq!(
        session.view(&run),
        RunView::Completed {
            total: 4,
            correct: 3
        }
    );
}

#[test]
fn test_local_run_rejects_out_of_turn_answers() {
    let mut run = LocalRun::new(vec![
        question(1, QuestionKind::Single, 2),
        question(2, QuestionKind::Text, 0),
    ]);

    assert!(matches!(
        run.record_answer(&QuestionId::for_number(2), AnswerPayload::Text("x".into())),
        Err(QuizError::NotCurrentQuestion(_))
    ));
    assert!(matches!(
        run.record_answer(&QuestionId::for_number(9), AnswerPayload::Text("x".into())),
        Err(QuizError::UnknownQuestion(_))
    ));
    assert!(matches!(
        run.record_answer(&QuestionId::for_number(1), AnswerPayload::Text("x".into())),
        Err(QuizError::PayloadMismatch(_))
    ));
    assert!(matches!(
        run.record_answer(
            &QuestionId::for_number(1),
            AnswerPayload::Choices(vec![true, false, false])
        ),
        Err(QuizError::PayloadMismatch(_))
    ));
    assert_eq!(run.cursor(), &RunCursor::default());

    // Missing trailing entries count as unselected
    run.record_answer(&QuestionId::for_number(1), AnswerPayload::Choices(vec![true]))
        .unwrap();
    run.record_answer(&QuestionId::for_number(2), AnswerPayload::Text("   ".into()))
        .unwrap();
    assert_eq!(run.cursor().correct, vec![true, false]);

    assert!(matches!(
        run.record_answer(&QuestionId::for_number(2), AnswerPayload::Text("x".into())),
        Err(QuizError::RunComplete)
    ));
}

#[test]
fn test_app_state_submit_and_dismiss() {
    let mut run = LocalRun::new(vec![
        question(1, QuestionKind::Multiple, 2),
        question(2, QuestionKind::Text, 0),
    ]);
    let mut state = AppState::new("Quiz".to_string(), &run, Messages::new(Lang::De));
    assert_eq!(state.input_mode, InputMode::ChoiceSelect);

    let job = state.sync(&run).expect("first question needs rendering");
    assert_eq!(job.text, "Text of question 1");
    assert!(state.sync(&run).is_none());

    state.toggle_choice(&run, 0);
    state.submit(&mut run);
    assert_eq!(state.top_dialog(), Some(&Dialog::Feedback));

    // Feedback keeps question 1 and its markup
    assert!(state.sync(&run).is_none());
    assert_eq!(state.session.index(), 0);

    state.dismiss_feedback(&run);
    assert!(!state.has_dialog());
    assert_eq!(state.session.index(), 1);
    assert_eq!(state.input_mode, InputMode::TextInput);

    let job = state.sync(&run).expect("second question needs rendering");
    assert_eq!(job.text, "Text of question 2");

    state.edit_text(&run, |text, cursor| {
        text.push_str("ß");
        *cursor = text.len();
    });
    assert_eq!(state.session.draft().text(), "ß");
    assert_eq!(state.text_cursor, 2);
}
