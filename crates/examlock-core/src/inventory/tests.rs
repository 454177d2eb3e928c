use super::*;

#[cfg(unix)]
fn spawn_sleeper() -> std::process::Child {
    std::process::Command::new("sleep")
        .arg("30")
        .spawn()
        .expect("spawn sleep child")
}

#[cfg(unix)]
fn wait_until_exited(inventory: &ProcessInventory, pid: u32) -> bool {
    use std::time::{Duration, Instant};

    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        if inventory.is_exited(pid) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

#[test]
fn list_includes_the_current_process() {
    let inventory = ProcessInventory::new().unwrap();
    let own_pid = std::process::id();

    let processes = inventory.list_processes();
    let own = processes.iter().find(|record| record.pid == own_pid);
    let own = own.expect("own process present in inventory");
    assert!(!own.name.is_empty());
}

#[test]
fn fractions_stay_in_range() {
    let inventory = ProcessInventory::new().unwrap();
    for record in inventory.list_processes() {
        assert!((0.0..=1.0).contains(&record.memory_fraction), "{record:?}");
        assert!(record.cpu_fraction >= 0.0, "{record:?}");
    }
}

#[cfg(unix)]
#[test]
fn graceful_terminate_kills_a_cooperative_child() {
    let inventory = ProcessInventory::new().unwrap();
    let mut child = spawn_sleeper();
    let pid = child.id();

    assert_eq!(inventory.terminate_graceful(pid), Some(true));
    // The child dies on SIGTERM; until it is reaped below it lingers as a
    // zombie, which still counts as exited.
    assert!(wait_until_exited(&inventory, pid));

    child.wait().expect("reap child");
}

#[cfg(unix)]
#[test]
fn signalling_a_reaped_pid_reports_not_found() {
    let inventory = ProcessInventory::new().unwrap();
    let mut child = spawn_sleeper();
    let pid = child.id();

    assert_eq!(inventory.kill_forced(pid), Some(true));
    child.wait().expect("reap child");

    assert!(inventory.is_exited(pid));
    assert_eq!(inventory.terminate_graceful(pid), None);
    assert_eq!(inventory.kill_forced(pid), None);
}

#[test]
fn process_state_folds_platform_statuses() {
    assert_eq!(ProcessState::from(ProcessStatus::Run), ProcessState::Running);
    assert_eq!(
        ProcessState::from(ProcessStatus::Sleep),
        ProcessState::Sleeping
    );
    assert_eq!(
        ProcessState::from(ProcessStatus::Zombie),
        ProcessState::Zombie
    );
    assert_eq!(
        ProcessState::from(ProcessStatus::Stop),
        ProcessState::Unknown
    );
}
