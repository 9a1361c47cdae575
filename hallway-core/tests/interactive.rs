use hallway_core::{
    dummy::{DummyWorld, ScriptedProtocol},
    record::Record,
    ActionClass, ControlMode, DecisionScheduler, DecisionSource, EpisodeEndReason, KeyState,
    PendingAction, SchedulerConfig, SchedulerState,
};
use test_log::test;

const EPS: f32 = 1e-3;
const FRAME: f32 = 1.0 / 60.0;

fn scheduler(replay_steps_per_tick: Option<usize>) -> DecisionScheduler {
    let config = SchedulerConfig::default()
        .mode(ControlMode::Interactive)
        .replay_steps_per_tick(replay_steps_per_tick);
    DecisionScheduler::build(config).unwrap()
}

/// One frame and one fixed tick with the given keys held.
fn tick(
    scheduler: &mut DecisionScheduler,
    world: &mut DummyWorld,
    protocol: &mut ScriptedProtocol,
    keys: KeyState,
) -> Option<Record> {
    scheduler.frame_tick(keys, FRAME);
    scheduler.fixed_tick(world, protocol)
}

/// Holds forward for 2 seconds, then releases all keys for the rest of the episode.
///
/// Returns the record if the episode ended within 500 ticks.
fn hold_and_release(
    scheduler: &mut DecisionScheduler,
    world: &mut DummyWorld,
    protocol: &mut ScriptedProtocol,
) -> Option<Record> {
    for _ in 0..100 {
        assert!(tick(scheduler, world, protocol, KeyState::FORWARD).is_none());
    }
    for _ in 100..499 {
        assert!(tick(scheduler, world, protocol, KeyState::RELEASED).is_none());
        assert_eq!(scheduler.trajectory().len(), scheduler.decisions());
    }
    tick(scheduler, world, protocol, KeyState::RELEASED)
}

#[test]
fn test_release_after_hold_records_one_step() {
    let mut world = DummyWorld::hallway();
    let mut protocol = ScriptedProtocol::default();
    let mut scheduler = scheduler(None);
    scheduler.begin_episode(&mut world);

    for _ in 0..100 {
        tick(&mut scheduler, &mut world, &mut protocol, KeyState::FORWARD);
    }
    assert!(scheduler.trajectory().is_empty());
    assert_eq!(scheduler.state(), SchedulerState::AwaitingDecision);

    tick(&mut scheduler, &mut world, &mut protocol, KeyState::RELEASED);
    assert_eq!(scheduler.state(), SchedulerState::Committed);
    assert_eq!(scheduler.decisions(), 1);
    assert_eq!(scheduler.trajectory().len(), 1);

    let step = scheduler.trajectory().front().unwrap();
    assert_eq!(step.action.class, ActionClass::Forward);
    assert!((step.action.delay - 2.0).abs() < 0.05);
    // Captured when the window opened
    assert_eq!(step.observation.scalars[0], 0.0);
    // Decision cost and 100 tick costs
    assert!((step.reward + 1.1).abs() < EPS);

    assert_eq!(scheduler.committed().class, ActionClass::Idle);
    assert_eq!(scheduler.staged(), Some(PendingAction::default()));
    assert_eq!(&world.locomotion()[99..], &[ActionClass::Forward, ActionClass::Idle]);

    // Operator decisions never reach the protocol while the episode is live
    assert!(protocol.requests().is_empty());
}

#[test]
fn test_ceiling_forces_a_decision() {
    let mut world = DummyWorld::hallway();
    let mut protocol = ScriptedProtocol::default();
    let mut scheduler = scheduler(None);
    scheduler.begin_episode(&mut world);

    for _ in 0..124 {
        tick(&mut scheduler, &mut world, &mut protocol, KeyState::FORWARD);
    }
    assert!(scheduler.trajectory().is_empty());
    tick(&mut scheduler, &mut world, &mut protocol, KeyState::FORWARD);

    let step = scheduler.trajectory().front().unwrap();
    assert_eq!(step.action.class, ActionClass::Forward);
    assert!((step.action.delay - 2.5).abs() < 1e-4);
    assert_eq!(scheduler.committed().class, ActionClass::Forward);
}

#[test]
fn test_trajectory_is_replayed_at_timeout() {
    let mut world = DummyWorld::hallway();
    let mut protocol = ScriptedProtocol::default();
    let mut scheduler = scheduler(None);
    scheduler.begin_episode(&mut world);

    let record = hold_and_release(&mut scheduler, &mut world, &mut protocol).unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Terminated);

    // Decisions at 2.02s, then every 2.5s
    assert_eq!(record.get_scalar("decisions").unwrap(), 4.0);
    assert_eq!(record.get_scalar("replayed_steps").unwrap(), 3.0);
    assert_eq!(record.get_string("outcome").unwrap(), "timeout");

    let requests = protocol.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(protocol.n_advances(), 3);
    assert!(requests.iter().all(|r| r.source == DecisionSource::Replay));

    let first = &requests[0];
    assert_eq!(first.observation.scalars[0], 0.0);
    assert!((first.reward + 1.1).abs() < EPS);
    let heuristic = first.heuristic.unwrap();
    assert_eq!(heuristic.class_index, 1);
    assert!((heuristic.delay_parameter - 0.76).abs() < 0.01);

    // The operator idled until the ceiling
    for r in &requests[1..] {
        let heuristic = r.heuristic.unwrap();
        assert_eq!(heuristic.class_index, 0);
        assert!((heuristic.delay_parameter - 1.0).abs() < 1e-4);
        assert!((r.reward + 1.35).abs() < EPS);
    }

    let end = &protocol.ends()[0];
    assert_eq!(end.reason, EpisodeEndReason::Timeout);
    assert_eq!(end.heuristic.unwrap().class_index, 0);
    // Last step, 25 tick costs and the timeout penalty
    assert!((end.reward + 2.6).abs() < EPS);

    let delivered: f32 = requests.iter().map(|r| r.reward).sum::<f32>() + end.reward;
    assert!((delivered + 6.4).abs() < EPS);
    assert!((scheduler.episode_reward() + 6.4).abs() < EPS);
    assert!(scheduler.trajectory().is_empty());
}

#[test]
fn test_replay_is_spread_over_fixed_ticks() {
    let mut world = DummyWorld::hallway();
    let mut protocol = ScriptedProtocol::default();
    let mut scheduler = scheduler(Some(1));
    scheduler.begin_episode(&mut world);

    assert!(hold_and_release(&mut scheduler, &mut world, &mut protocol).is_none());
    assert_eq!(
        scheduler.state(),
        SchedulerState::Replaying(EpisodeEndReason::Timeout)
    );
    assert_eq!(scheduler.trajectory().len(), 4);
    assert!(protocol.requests().is_empty());

    // The protocol sees the oldest remaining step
    let front = scheduler.trajectory().front().unwrap().clone();
    assert_eq!(scheduler.current_observation(&world), front.observation);
    assert_eq!(
        scheduler.heuristic_output().unwrap().class_index,
        front.action.class.index() as i64
    );

    assert!(tick(&mut scheduler, &mut world, &mut protocol, KeyState::FORWARD).is_none());
    assert_eq!(protocol.requests().len(), 1);
    assert_eq!(protocol.requests()[0].observation, front.observation);
    assert!(tick(&mut scheduler, &mut world, &mut protocol, KeyState::FORWARD).is_none());

    let record = tick(&mut scheduler, &mut world, &mut protocol, KeyState::FORWARD).unwrap();
    assert_eq!(record.get_scalar("replayed_steps").unwrap(), 3.0);
    assert_eq!(protocol.ends().len(), 1);
    assert_eq!(scheduler.state(), SchedulerState::Terminated);

    // The world and the operator input were frozen during the replay
    assert_eq!(world.locomotion().len(), 500);
    assert_eq!(scheduler.staged(), Some(PendingAction::default()));
}

#[test]
fn test_paced_replay_without_pending_steps_ends_at_once() {
    let mut world = DummyWorld::hallway();
    let mut protocol = ScriptedProtocol::default();
    let mut scheduler = scheduler(Some(4));
    scheduler.begin_episode(&mut world);

    tick(&mut scheduler, &mut world, &mut protocol, KeyState::FORWARD);
    assert!(scheduler.trajectory().is_empty());
    let record = scheduler
        .on_goal_triggered(true, &world, &mut protocol)
        .unwrap();
    assert_eq!(record.get_string("outcome").unwrap(), "goal");
    assert_eq!(scheduler.state(), SchedulerState::Terminated);
    assert_eq!(protocol.ends().len(), 1);
    assert!(protocol.requests().is_empty());

    // A single recorded step is the terminal one, nothing is left to pace
    scheduler.begin_episode(&mut world);
    for _ in 0..25 {
        tick(&mut scheduler, &mut world, &mut protocol, KeyState::FORWARD);
    }
    tick(&mut scheduler, &mut world, &mut protocol, KeyState::RELEASED);
    assert_eq!(scheduler.trajectory().len(), 1);
    let record = scheduler
        .on_goal_triggered(false, &world, &mut protocol)
        .unwrap();
    assert_eq!(record.get_string("outcome").unwrap(), "fail");
    assert_eq!(record.get_scalar("replayed_steps").unwrap(), 0.0);
    assert_eq!(scheduler.state(), SchedulerState::Terminated);
    assert_eq!(protocol.ends().len(), 2);
    assert_eq!(protocol.ends()[1].heuristic.unwrap().class_index, 1);
}

#[test]
#[should_panic]
fn test_begin_episode_while_replaying_panics() {
    let mut world = DummyWorld::hallway();
    let mut protocol = ScriptedProtocol::default();
    let mut scheduler = scheduler(Some(1));
    scheduler.begin_episode(&mut world);

    hold_and_release(&mut scheduler, &mut world, &mut protocol);
    scheduler.begin_episode(&mut world);
}

#[test]
fn test_goal_before_any_decision_ends_with_live_observation() {
    let mut world = DummyWorld::hallway();
    let mut protocol = ScriptedProtocol::default();
    let mut scheduler = scheduler(None);
    scheduler.begin_episode(&mut world);

    for _ in 0..10 {
        tick(&mut scheduler, &mut world, &mut protocol, KeyState::FORWARD);
    }
    let record = scheduler
        .on_goal_triggered(true, &world, &mut protocol)
        .unwrap();
    assert_eq!(record.get_string("outcome").unwrap(), "goal");
    assert_eq!(record.get_scalar("replayed_steps").unwrap(), 0.0);

    assert!(protocol.requests().is_empty());
    let end = &protocol.ends()[0];
    assert!(end.heuristic.is_none());
    assert_eq!(end.observation, scheduler.current_observation(&world));
    assert!((end.observation.scalars[0] - 0.02).abs() < 1e-5);
    // 10 tick costs, no timeout penalty
    assert!((end.reward + 0.1).abs() < EPS);
}

#[test]
fn test_goal_with_one_step_sends_it_as_terminal() {
    let mut world = DummyWorld::hallway();
    let mut protocol = ScriptedProtocol::default();
    let mut scheduler = scheduler(None);
    scheduler.begin_episode(&mut world);

    for _ in 0..25 {
        tick(&mut scheduler, &mut world, &mut protocol, KeyState::FORWARD);
    }
    // Switching to a turn commits the forward walk
    let turn = KeyState {
        turn_right: true,
        ..KeyState::RELEASED
    };
    tick(&mut scheduler, &mut world, &mut protocol, turn);
    assert_eq!(scheduler.decisions(), 1);
    for _ in 0..5 {
        tick(&mut scheduler, &mut world, &mut protocol, turn);
    }
    assert_eq!(world.locomotion()[26], ActionClass::TurnRight);

    scheduler.on_goal_triggered(false, &world, &mut protocol).unwrap();
    assert!(protocol.requests().is_empty());
    let end = &protocol.ends()[0];
    assert_eq!(end.heuristic.unwrap().class_index, 1);
    assert_eq!(
        end.reason,
        EpisodeEndReason::GoalReached {
            outcome_matches: false
        }
    );
    // The step and the 6 ticks after it
    assert!((end.reward + 0.41).abs() < EPS);
}
