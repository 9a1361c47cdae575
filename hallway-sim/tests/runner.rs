use anyhow::Result;
use hallway_core::{
    record::{BufferedRecorder, NullRecorder},
    ControlMode, SchedulerConfig, SchedulerState,
};
use hallway_sim::{Runner, SimConfig};
use test_log::test;

fn config(mode: ControlMode, replay_steps_per_tick: Option<usize>) -> SimConfig {
    SimConfig::default().seed(3).scheduler(
        SchedulerConfig::default()
            .mode(mode)
            .replay_steps_per_tick(replay_steps_per_tick),
    )
}

#[test]
fn test_autonomous_episodes() -> Result<()> {
    let mut runner = Runner::build(&config(ControlMode::Autonomous, None))?;
    let mut recorder = BufferedRecorder::new();
    runner.run(3, 2, &mut recorder)?;

    let records: Vec<_> = recorder.iter().collect();
    assert_eq!(records.len(), 3);
    assert_eq!(recorder.aggregates().len(), 2);
    assert_eq!(recorder.n_stored(), 0);

    let decisions: f32 = records
        .iter()
        .map(|r| r.get_scalar("decisions").unwrap())
        .sum();
    let reward: f32 = records
        .iter()
        .map(|r| r.get_scalar("episode_reward").unwrap())
        .sum();

    let policy = runner.protocol();
    assert_eq!(policy.n_live() as f32, decisions);
    assert_eq!(policy.n_demonstrations(), 0);
    assert_eq!(policy.n_episodes(), 3);
    assert!((policy.received_reward() - reward).abs() < 1e-2);
    for record in records {
        assert!(record.get_scalar("elapsed").unwrap() <= 10.0 + 1e-3);
        assert_eq!(record.get_scalar("replayed_steps").unwrap(), 0.0);
    }
    Ok(())
}

#[test]
fn test_interactive_episodes_become_demonstrations() -> Result<()> {
    let mut runner = Runner::build(&config(ControlMode::Interactive, None))?;
    let mut decisions = 0.0;
    for _ in 0..3 {
        let record = runner.run_episode()?;
        let n = record.get_scalar("decisions").unwrap();
        let replayed = record.get_scalar("replayed_steps").unwrap();
        // All decisions but the terminal one are replayed
        assert_eq!(replayed, (n - 1.0).max(0.0));
        decisions += n;
        assert_eq!(runner.scheduler().state(), SchedulerState::Terminated);
    }

    let policy = runner.protocol();
    assert_eq!(policy.n_live(), 0);
    assert_eq!(policy.n_demonstrations() as f32, decisions);
    assert_eq!(policy.n_episodes(), 3);
    Ok(())
}

#[test]
fn test_incremental_replay_ends_episodes() -> Result<()> {
    let mut runner = Runner::build(&config(ControlMode::Interactive, Some(2)))?;
    let mut recorder = BufferedRecorder::new();
    runner.run(2, 0, &mut recorder)?;
    assert_eq!(recorder.iter().count(), 2);
    assert_eq!(recorder.aggregates().len(), 1);
    assert_eq!(runner.protocol().n_episodes(), 2);
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SimConfig::default().frame_rate(0.0);
    assert!(Runner::build(&config).is_err());
    let config =
        SimConfig::default().scheduler(SchedulerConfig::default().max_episode_duration(0.0));
    assert!(Runner::build(&config).is_err());
}

#[test]
fn test_records_can_be_discarded() -> Result<()> {
    let mut runner = Runner::build(&config(ControlMode::Autonomous, None))?;
    runner.run(2, 1, &mut NullRecorder::default())?;
    assert_eq!(runner.protocol().n_episodes(), 2);
    Ok(())
}
