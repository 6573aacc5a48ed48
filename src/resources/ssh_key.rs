//! SSH keypair resource: generate an ed25519 key and load it into an agent.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::error::ResourceError;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;
use crate::operations::FileSystemOps;

/// Environment exported by `ssh-agent -s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentEnv {
    /// `SSH_AUTH_SOCK`.
    pub auth_sock: String,
    /// `SSH_AGENT_PID`.
    pub agent_pid: String,
}

/// Parse the Bourne-shell snippet printed by `ssh-agent -s`.
///
/// ```text
/// SSH_AUTH_SOCK=/tmp/ssh-XXXX/agent.123; export SSH_AUTH_SOCK;
/// SSH_AGENT_PID=124; export SSH_AGENT_PID;
/// echo Agent pid 124;
/// ```
///
/// # Errors
///
/// Returns [`ResourceError::InvalidState`] if either variable is absent.
pub fn parse_agent_env(output: &str) -> Result<AgentEnv, ResourceError> {
    let mut auth_sock = None;
    let mut agent_pid = None;
    for assignment in output.split([';', '\n']).map(str::trim) {
        if let Some(v) = assignment.strip_prefix("SSH_AUTH_SOCK=") {
            auth_sock = Some(v.to_string());
        } else if let Some(v) = assignment.strip_prefix("SSH_AGENT_PID=") {
            agent_pid = Some(v.to_string());
        }
    }
    match (auth_sock, agent_pid) {
        (Some(auth_sock), Some(agent_pid)) => Ok(AgentEnv {
            auth_sock,
            agent_pid,
        }),
        (None, _) => Err(ResourceError::InvalidState {
            resource: "ssh-agent".to_string(),
            reason: "output did not contain SSH_AUTH_SOCK".to_string(),
        }),
        (_, None) => Err(ResourceError::InvalidState {
            resource: "ssh-agent".to_string(),
            reason: "output did not contain SSH_AGENT_PID".to_string(),
        }),
    }
}

/// An SSH private key at a fixed path; its `.pub` half sits next to it.
#[derive(Debug)]
pub struct SshKeyResource<'a> {
    /// Private key path.
    pub key_path: PathBuf,
    /// Comment embedded in the key (the user's email).
    pub email: String,
    executor: &'a dyn Executor,
    fs_ops: &'a dyn FileSystemOps,
}

impl<'a> SshKeyResource<'a> {
    /// Create a resource for the key at `key_path`.
    #[must_use]
    pub fn new(
        key_path: PathBuf,
        email: String,
        executor: &'a dyn Executor,
        fs_ops: &'a dyn FileSystemOps,
    ) -> Self {
        Self {
            key_path,
            email,
            executor,
            fs_ops,
        }
    }

    /// Path of the public half (`<key>.pub`).
    #[must_use]
    pub fn public_key_path(&self) -> PathBuf {
        public_key_path(&self.key_path)
    }

    fn ensure_ssh_dir(&self) -> Result<()> {
        let Some(dir) = self.key_path.parent() else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create directory: {}", dir.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))
                .with_context(|| format!("set permissions on {}", dir.display()))?;
        }
        Ok(())
    }
}

/// Path of the public half of `key_path`.
#[must_use]
pub fn public_key_path(key_path: &std::path::Path) -> PathBuf {
    let mut name = key_path.as_os_str().to_os_string();
    name.push(".pub");
    PathBuf::from(name)
}

impl Applicable for SshKeyResource<'_> {
    fn description(&self) -> String {
        self.key_path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.ensure_ssh_dir()?;

        let key = self.key_path.to_string_lossy();
        self.executor.run(
            "ssh-keygen",
            &["-t", "ed25519", "-C", &self.email, "-f", &key, "-N", ""],
        )?;

        let agent = self.executor.run("ssh-agent", &["-s"])?;
        let env = parse_agent_env(&agent.stdout)?;
        self.executor.run_with_env(
            "ssh-add",
            &[&key],
            &[
                ("SSH_AUTH_SOCK", &env.auth_sock),
                ("SSH_AGENT_PID", &env.agent_pid),
            ],
        )?;

        Ok(ResourceChange::Applied)
    }
}

impl Resource for SshKeyResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.fs_ops.exists(&self.key_path) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::operations::{MockFileSystemOps, SystemFileSystemOps};
    use crate::resources::test_helpers::MockExecutor;

    const AGENT_OUTPUT: &str = "SSH_AUTH_SOCK=/tmp/ssh-abc/agent.123; export SSH_AUTH_SOCK;\n\
                                SSH_AGENT_PID=124; export SSH_AGENT_PID;\n\
                                echo Agent pid 124;\n";

    #[test]
    fn parses_agent_environment() {
        let env = parse_agent_env(AGENT_OUTPUT).unwrap();
        assert_eq!(env.auth_sock, "/tmp/ssh-abc/agent.123");
        assert_eq!(env.agent_pid, "124");
    }

    #[test]
    fn missing_socket_is_an_error() {
        let err = parse_agent_env("SSH_AGENT_PID=1; export SSH_AGENT_PID;").unwrap_err();
        assert!(err.to_string().contains("SSH_AUTH_SOCK"));
    }

    #[test]
    fn missing_pid_is_an_error() {
        let err = parse_agent_env("SSH_AUTH_SOCK=/tmp/s; export SSH_AUTH_SOCK;").unwrap_err();
        assert!(err.to_string().contains("SSH_AGENT_PID"));
    }

    #[test]
    fn public_key_path_appends_pub() {
        assert_eq!(
            public_key_path(std::path::Path::new("/home/test/.ssh/id_ed25519")),
            PathBuf::from("/home/test/.ssh/id_ed25519.pub")
        );
    }

    #[test]
    fn existing_key_is_correct() {
        let key = PathBuf::from("/home/test/.ssh/id_ed25519");
        let fs = MockFileSystemOps::new().with_file(&key, "PRIVATE");
        let executor = MockExecutor::default();
        let resource = SshKeyResource::new(key, "me@example.com".into(), &executor, &fs);
        assert_eq!(resource.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(executor.call_count(), 0);
    }

    #[test]
    fn absent_key_is_missing() {
        let fs = MockFileSystemOps::new();
        let executor = MockExecutor::default();
        let resource = SshKeyResource::new(
            PathBuf::from("/home/test/.ssh/id_ed25519"),
            "me@example.com".into(),
            &executor,
            &fs,
        );
        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn apply_generates_key_and_adds_it_to_agent() {
        let dir = tempfile::tempdir().unwrap();
        let ssh_dir = dir.path().join(".ssh");
        let key = ssh_dir.join("id_ed25519");
        let executor = MockExecutor::succeeding(&["", AGENT_OUTPUT, "Identity added"]);
        let resource =
            SshKeyResource::new(key.clone(), "me@example.com".into(), &executor, &SystemFileSystemOps);

        assert_eq!(resource.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);

        let key_str = key.display().to_string();
        assert_eq!(
            executor.calls(),
            [
                format!("ssh-keygen -t ed25519 -C me@example.com -f {key_str} -N "),
                "ssh-agent -s".to_string(),
                format!("ssh-add {key_str}"),
            ]
        );
        assert_eq!(
            executor.envs(),
            [vec![
                ("SSH_AUTH_SOCK".to_string(), "/tmp/ssh-abc/agent.123".to_string()),
                ("SSH_AGENT_PID".to_string(), "124".to_string()),
            ]]
        );
        assert!(ssh_dir.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn apply_restricts_ssh_dir_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let ssh_dir = dir.path().join(".ssh");
        let executor = MockExecutor::succeeding(&["", AGENT_OUTPUT, ""]);
        let resource = SshKeyResource::new(
            ssh_dir.join("id_ed25519"),
            "me@example.com".into(),
            &executor,
            &SystemFileSystemOps,
        );
        resource.apply().unwrap();
        let mode = std::fs::metadata(&ssh_dir).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn keygen_failure_stops_before_agent() {
        let dir = tempfile::tempdir().unwrap();
        let executor = MockExecutor::fail();
        let resource = SshKeyResource::new(
            dir.path().join(".ssh/id_ed25519"),
            "me@example.com".into(),
            &executor,
            &SystemFileSystemOps,
        );
        assert!(resource.apply().is_err());
        assert_eq!(executor.call_count(), 1);
    }
}
