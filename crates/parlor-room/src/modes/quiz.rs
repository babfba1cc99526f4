//! Multiple-choice quiz. A fixed number of timed questions, scored once
//! per question when its timer runs out.

use std::collections::HashMap;

use parlor_protocol::{ClientEvent, GameMode, PlayerId, ServerEvent};
use parlor_timer::RoundTimer;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use super::{Flow, ModeCtx, ModeEngine};
use crate::Scoreboard;
use crate::content::TriviaQuestion;

const CORRECT_ANSWER_POINTS: u32 = 100;

#[derive(Debug)]
pub(crate) struct Quiz {
    round: u32,
    scores: Scoreboard,
    question: Option<TriviaQuestion>,
    /// Last answer per player for the open question.
    answers: HashMap<PlayerId, usize>,
    timer: RoundTimer,
}

impl Quiz {
    pub fn start(epoch: u64, ctx: &mut ModeCtx<'_>) -> (Self, Flow) {
        let mut quiz = Self {
            round: 0,
            scores: Scoreboard::for_players(ctx.roster.ids()),
            question: None,
            answers: HashMap::new(),
            timer: RoundTimer::new(epoch),
        };
        let flow = quiz.ask(ctx);
        (quiz, flow)
    }

    /// Opens the next question, or finishes after `quiz_rounds`.
    /// Questions are drawn independently, so repeats are possible.
    fn ask(&mut self, ctx: &mut ModeCtx<'_>) -> Flow {
        self.timer.cancel();
        self.answers.clear();
        self.round += 1;
        if self.round > ctx.config.quiz_rounds {
            info!(rounds = ctx.config.quiz_rounds, "quiz finished");
            return Flow::Finished(std::mem::take(&mut self.scores));
        }
        let Some(question) = ctx.content.questions.choose(ctx.rng) else {
            return Flow::Finished(std::mem::take(&mut self.scores));
        };

        ctx.out.to_all(ServerEvent::TriviaQuestion {
            question: question.question.clone(),
            answers: question.answers.clone(),
            round: self.round,
        });
        debug!(round = self.round, "quiz question asked");
        self.question = Some(question.clone());
        self.timer.arm(ctx.config.quiz_round);
        Flow::Continue
    }

    /// Scores the open question and tells each player how they did.
    fn close_round(&mut self, ctx: &mut ModeCtx<'_>) {
        let Some(question) = self.question.take() else {
            return;
        };
        for id in ctx.roster.ids() {
            let chosen = self.answers.get(&id).copied();
            if chosen == Some(question.correct) {
                self.scores.add(id, CORRECT_ANSWER_POINTS);
            }
            ctx.out.to_player(
                id,
                ServerEvent::TriviaResults {
                    correct_answer: question.correct,
                    player_answer: chosen,
                },
            );
        }
        ctx.out.to_all(ServerEvent::TriviaScores {
            scores: self.scores.entries(),
        });
    }
}

impl ModeEngine for Quiz {
    fn kind(&self) -> GameMode {
        GameMode::Trivia
    }

    fn handle(&mut self, sender: PlayerId, event: ClientEvent, _ctx: &mut ModeCtx<'_>) -> Flow {
        let answer = match event {
            ClientEvent::TriviaAnswer { answer } => answer,
            other => {
                debug!(%sender, event = ?other, "not a quiz event, dropping");
                return Flow::Continue;
            }
        };
        let Some(question) = &self.question else {
            return Flow::Continue;
        };
        if answer >= question.answers.len() {
            debug!(%sender, answer, "answer index out of range, dropping");
            return Flow::Continue;
        }
        self.answers.insert(sender, answer);
        Flow::Continue
    }

    fn on_timer(&mut self, ctx: &mut ModeCtx<'_>) -> Flow {
        self.close_round(ctx);
        self.ask(ctx)
    }

    fn on_player_joined(&mut self, player_id: PlayerId, _ctx: &mut ModeCtx<'_>) {
        self.scores.ensure(player_id);
    }

    fn on_player_left(&mut self, player_id: PlayerId, _ctx: &mut ModeCtx<'_>) -> Flow {
        self.scores.remove(player_id);
        self.answers.remove(&player_id);
        Flow::Continue
    }

    fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    fn timer_mut(&mut self) -> &mut RoundTimer {
        &mut self.timer
    }
}

#[cfg(test)]
mod tests {
    use parlor_protocol::{Recipient, ScoreEntry};

    use super::*;
    use crate::modes::test_support::Harness;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn answer(index: usize) -> ClientEvent {
        ClientEvent::TriviaAnswer { answer: index }
    }

    fn started(n: u64) -> (Harness, Quiz) {
        let mut h = Harness::with_players(n);
        let (quiz, flow) = Quiz::start(1, &mut h.ctx());
        assert_eq!(flow, Flow::Continue);
        (h, quiz)
    }

    #[test]
    fn test_start_broadcasts_first_question() {
        let (mut h, quiz) = started(3);
        assert_eq!(
            h.drain(),
            vec![(
                Recipient::All,
                ServerEvent::TriviaQuestion {
                    question: "2 + 2?".into(),
                    answers: vec!["3".into(), "4".into(), "5".into()],
                    round: 1,
                }
            )]
        );
        assert!(quiz.timer.is_armed());
    }

    #[test]
    fn test_answers_are_scored_only_at_round_close() {
        let (mut h, mut quiz) = started(3);
        quiz.handle(pid(1), answer(1), &mut h.ctx());
        assert_eq!(quiz.scores.get(pid(1)), Some(0));

        quiz.on_timer(&mut h.ctx());
        assert_eq!(quiz.scores.get(pid(1)), Some(100));
        assert_eq!(quiz.scores.get(pid(2)), Some(0));
    }

    #[test]
    fn test_last_answer_wins() {
        let (mut h, mut quiz) = started(3);
        quiz.handle(pid(1), answer(1), &mut h.ctx());
        quiz.handle(pid(1), answer(0), &mut h.ctx());
        quiz.handle(pid(2), answer(0), &mut h.ctx());
        quiz.handle(pid(2), answer(1), &mut h.ctx());
        quiz.on_timer(&mut h.ctx());
        assert_eq!(quiz.scores.get(pid(1)), Some(0));
        assert_eq!(quiz.scores.get(pid(2)), Some(100));
    }

    #[test]
    fn test_out_of_range_answer_is_dropped() {
        let (mut h, mut quiz) = started(3);
        quiz.handle(pid(1), answer(1), &mut h.ctx());
        quiz.handle(pid(1), answer(3), &mut h.ctx());
        quiz.on_timer(&mut h.ctx());
        assert_eq!(quiz.scores.get(pid(1)), Some(100));
    }

    #[test]
    fn test_round_close_sends_private_results_then_scores() {
        let (mut h, mut quiz) = started(3);
        quiz.handle(pid(2), answer(0), &mut h.ctx());
        h.drain();

        quiz.on_timer(&mut h.ctx());
        let events = h.drain();

        let results: Vec<_> = events
            .iter()
            .filter_map(|(to, e)| match (to, e) {
                (Recipient::Player(id), ServerEvent::TriviaResults { player_answer, .. }) => {
                    Some((*id, *player_answer))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            results,
            vec![(pid(1), None), (pid(2), Some(0)), (pid(3), None)]
        );
        assert!(matches!(events[3].1, ServerEvent::TriviaScores { .. }));
        assert!(matches!(
            events[4].1,
            ServerEvent::TriviaQuestion { round: 2, .. }
        ));
    }

    #[test]
    fn test_finishes_after_configured_rounds() {
        let (mut h, mut quiz) = started(3);
        for round in 1..=10 {
            quiz.handle(pid(3), answer(1), &mut h.ctx());
            let flow = quiz.on_timer(&mut h.ctx());
            if round < 10 {
                assert_eq!(flow, Flow::Continue);
            } else {
                let Flow::Finished(scores) = flow else {
                    panic!("expected the quiz to finish");
                };
                assert_eq!(
                    scores.leader(),
                    Some(ScoreEntry {
                        player_id: pid(3),
                        score: 1000
                    })
                );
            }
        }
        assert!(!quiz.timer.is_armed());
    }

    #[test]
    fn test_leaver_loses_entry_and_answer() {
        let (mut h, mut quiz) = started(4);
        quiz.handle(pid(4), answer(1), &mut h.ctx());
        h.roster.leave(pid(4));
        quiz.on_player_left(pid(4), &mut h.ctx());
        quiz.on_timer(&mut h.ctx());
        assert_eq!(quiz.scores.get(pid(4)), None);
        assert_eq!(quiz.scores.len(), 3);
    }
}
