use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::{predicate, PredicateBooleanExt};

const TWO_TASKS: &str = "2\n5\n5\n-1,-1\n";

const CHAIN: &str = r#"4
3
3
3
3
1,2
2,3
3,4
-1,-1
"#;

fn solve_cmd(file: &NamedTempFile, cycle_time: &str, strategy: &str) -> Command {
    let mut cmd = Command::cargo_bin("ualbp-sat").unwrap();
    cmd.arg("solve")
        .arg("-f")
        .arg(file.path())
        .arg("-c")
        .arg(cycle_time)
        .arg("--strategy")
        .arg(strategy)
        .arg("--logging-level")
        .arg("off");
    cmd
}

fn test_two_tasks_for_strategy(strategy: &str) -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("two_tasks.IN2")?;
    file.write_str(TWO_TASKS)?;
    solve_cmd(&file, "10", strategy)
        .arg("--name")
        .arg("two-10")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^Instance: two-10, Final Stations: 1\nStation 1: 1[FB] 2[FB]\n\n$")?);
    file.close().unwrap();
    Ok(())
}

#[test]
fn test_two_tasks_exhaustive() -> Result<(), Box<dyn std::error::Error>> {
    test_two_tasks_for_strategy("exhaustive")
}

#[test]
fn test_two_tasks_lazy() -> Result<(), Box<dyn std::error::Error>> {
    test_two_tasks_for_strategy("lazy")
}

#[test]
fn test_two_tasks_pb() -> Result<(), Box<dyn std::error::Error>> {
    test_two_tasks_for_strategy("pb")
}

#[test]
fn test_chain_default_name() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("chain.IN2")?;
    file.write_str(CHAIN)?;
    solve_cmd(&file, "6", "lazy")
        .arg("-l")
        .arg("1")
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("Instance: chain.IN2-6, Final Stations: 2\n")
                .and(predicate::str::contains("Station 1: 1F"))
                .and(predicate::str::contains("Station 3").not()),
        );
    file.close().unwrap();
    Ok(())
}

#[test]
fn test_task_exceeds_cycle_time() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("two_tasks.IN2")?;
    file.write_str(TWO_TASKS)?;
    solve_cmd(&file, "4", "lazy")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Instance:").not());
    file.close().unwrap();
    Ok(())
}

#[test]
fn test_zero_cycle_time() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("two_tasks.IN2")?;
    file.write_str(TWO_TASKS)?;
    solve_cmd(&file, "0", "lazy").assert().failure();
    file.close().unwrap();
    Ok(())
}

#[test]
fn test_missing_file() {
    let mut cmd = Command::cargo_bin("ualbp-sat").unwrap();
    cmd.arg("solve")
        .arg("-f")
        .arg("/this/file/does/not/exist.IN2")
        .arg("-c")
        .arg("10")
        .arg("--logging-level")
        .arg("off");
    cmd.assert().failure();
}

#[test]
fn test_malformed_instance() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("malformed.IN2")?;
    file.write_str("2\n5\n5\n1,2\n")?;
    solve_cmd(&file, "10", "lazy").assert().failure();
    file.close().unwrap();
    Ok(())
}
