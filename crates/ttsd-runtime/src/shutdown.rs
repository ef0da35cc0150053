//! Termination of synthesis children with SIGTERM → SIGKILL escalation.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
#[cfg(unix)]
use tokio::time::timeout;

/// Terminate `child` and reap it.
///
/// # Strategy
/// 1. Send SIGTERM and wait up to `grace` for the process to exit
/// 2. If still running, send SIGKILL
/// 3. Wait for reaping so no zombie is left behind
///
/// On non-unix targets the child is killed immediately.
pub async fn terminate(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        terminate_unix(child, grace).await
    }

    #[cfg(not(unix))]
    {
        let _ = grace;
        child.kill().await?;
        child.wait().await
    }
}

#[cfg(unix)]
async fn terminate_unix(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    // Already reaped.
    let Some(pid) = child.id() else {
        return child.wait().await;
    };
    let pid = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

    if let Err(e) = signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        if e == nix::errno::Errno::ESRCH {
            return child.wait().await;
        }
        return Err(io::Error::other(e));
    }

    if let Ok(result) = timeout(grace, child.wait()).await {
        return result;
    }

    child.kill().await?;
    child.wait().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::process::Command;
    use tokio::time::sleep;

    #[tokio::test]
    #[cfg(unix)]
    async fn terminate_stops_sleeping_child() {
        let mut child = Command::new("sleep")
            .arg("30")
            .spawn()
            .expect("failed to spawn sleep");

        let status = terminate(&mut child, Duration::from_millis(500))
            .await
            .unwrap();
        assert!(!status.success());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn terminate_escalates_when_sigterm_is_ignored() {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg("trap '' TERM; sleep 30")
            .spawn()
            .expect("failed to spawn sh");
        // Let the shell install its trap.
        sleep(Duration::from_millis(100)).await;

        let started = std::time::Instant::now();
        let status = terminate(&mut child, Duration::from_millis(200))
            .await
            .unwrap();
        assert!(!status.success());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn terminate_handles_already_exited() {
        let mut child = Command::new("true").spawn().expect("failed to spawn true");
        sleep(Duration::from_millis(100)).await;

        let result = terminate(&mut child, Duration::from_millis(100)).await;
        assert!(result.is_ok());
    }
}
