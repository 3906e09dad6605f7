use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::predicate;

fn check_cmd(file: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("ualbp-sat").unwrap();
    cmd.arg("check").arg("-f").arg(file.path());
    cmd
}

#[test]
fn test_check_ok() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("instance.IN2")?;
    file.write_str("3\n5\n2\n4\n1,2\n1,3\n-1,-1\n")?;
    check_cmd(&file)
        .arg("-c")
        .arg("6")
        .assert()
        .success()
        .stdout(predicate::str::contains("total duration is 11"))
        .stdout(predicate::str::contains("longest task is task 1 with duration 5"))
        .stdout(predicate::str::contains("is 2 station(s)"));
    file.close().unwrap();
    Ok(())
}

#[test]
fn test_check_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("instance.IN2")?;
    file.write_str("2\n1\n1\n1,2\n2,1\n-1,-1\n")?;
    check_cmd(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("the precedence graph has a cycle"));
    file.close().unwrap();
    Ok(())
}

#[test]
fn test_check_task_exceeds_cycle_time() -> Result<(), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("instance.IN2")?;
    file.write_str("3\n5\n2\n4\n-1,-1\n")?;
    check_cmd(&file).arg("-c").arg("4").assert().failure();
    file.close().unwrap();
    Ok(())
}
