//! Repository cloning behind the [`RepoCloner`] seam.
//!
//! Plugin installation only ever needs a fresh clone of a remote's default
//! branch; [`Git2Cloner`] does that in-process with `git2` instead of
//! shelling out to `git`.
use anyhow::{Context as _, Result};
use git2::{Cred, FetchOptions, RemoteCallbacks, Repository, SubmoduleUpdateOptions, build::RepoBuilder};
use std::path::Path;

/// Abstraction over cloning a remote repository.
#[cfg_attr(test, mockall::automock)]
pub trait RepoCloner: Send + Sync + std::fmt::Debug {
    /// Clone `url` into `dest`. `dest` must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the clone fails.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Production [`RepoCloner`] backed by `git2`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Cloner;

/// `FetchOptions` with SSH-agent credentials, falling back to defaults.
fn fetch_opts_with_creds() -> FetchOptions<'static> {
    let mut cb = RemoteCallbacks::new();
    cb.credentials(|_url, username_from_url, _allowed| {
        Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")).or_else(|_| Cred::default())
    });

    let mut fo = FetchOptions::new();
    fo.remote_callbacks(cb);
    fo
}

fn update_submodules(repo: &Repository) -> Result<()> {
    for mut sm in repo.submodules()? {
        sm.init(true)?;
        let mut opt = SubmoduleUpdateOptions::new();
        sm.update(true, Some(&mut opt))
            .with_context(|| format!("updating submodule {}", sm.path().display()))?;
    }
    Ok(())
}

impl RepoCloner for Git2Cloner {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_opts_with_creds());
        let repo = builder
            .clone(url, dest)
            .with_context(|| format!("git clone {url}"))?;
        update_submodules(&repo)
    }
}
