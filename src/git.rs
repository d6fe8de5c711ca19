//! Git-backed branch provider.
//!
//! Reads (discovery, branch enumeration, HEAD) go through libgit2; mutating
//! operations shell out to `git` so their combined output can be surfaced
//! verbatim as the diagnostic shown in Error mode.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Repository operations consumed by the interaction controller.
///
/// Mutating operations report failure as an error whose message is the
/// diagnostic text to display.
pub trait BranchProvider {
    /// All local branch names, in provider-defined order.
    fn list_branches(&self) -> Result<Vec<String>>;

    /// Name of the checked-out branch; empty on a detached HEAD.
    fn current_branch(&self) -> Result<String>;

    fn checkout(&self, name: &str) -> Result<()>;

    fn delete(&self, name: &str) -> Result<()>;

    /// Rename a branch. Moves the checkout pointer along when the renamed
    /// branch is currently checked out.
    fn rename(&self, old: &str, new: &str) -> Result<()>;

    /// Create `name` off `base` and check it out.
    fn create(&self, name: &str, base: &str) -> Result<()>;
}

/// [`BranchProvider`] over a real repository.
pub struct BranchManager {
    workdir: PathBuf,
    git_command: String,
}

impl BranchManager {
    /// Locate the repository enclosing `start` by walking parent
    /// directories, the way `git` itself does.
    pub fn discover(start: &Path, git_command: String) -> Result<Self> {
        let repo = git2::Repository::discover(start).context("no git repository found")?;
        let workdir = repo
            .workdir()
            .context("repository has no working directory")?
            .to_path_buf();
        log::debug!("using repository at {}", workdir.display());
        Ok(Self {
            workdir,
            git_command,
        })
    }

    /// The working directory of the discovered repository.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn open(&self) -> Result<git2::Repository> {
        git2::Repository::open(&self.workdir).context("failed to open repository")
    }

    fn run_git(&self, args: &[&str]) -> Result<()> {
        let output = Command::new(&self.git_command)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("failed to run {}", self.git_command))?;

        if !output.status.success() {
            bail!("{}", combined_output(&output));
        }
        Ok(())
    }
}

/// Interleaved stdout and stderr, the text git shows a user on failure.
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

impl BranchProvider for BranchManager {
    fn list_branches(&self) -> Result<Vec<String>> {
        let repo = self.open()?;
        let mut names = Vec::new();
        for entry in repo.branches(Some(git2::BranchType::Local))? {
            let (branch, _) = entry?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn current_branch(&self) -> Result<String> {
        let repo = self.open()?;
        let head = repo
            .find_reference("HEAD")
            .context("failed to read HEAD")?;
        match head.symbolic_target() {
            Some(target) => Ok(target
                .strip_prefix("refs/heads/")
                .unwrap_or(target)
                .to_string()),
            // Detached HEAD points at a commit, not a branch
            None => Ok(String::new()),
        }
    }

    fn checkout(&self, name: &str) -> Result<()> {
        log::info!("checking out {}", name);
        self.run_git(&["checkout", name])
    }

    fn delete(&self, name: &str) -> Result<()> {
        log::info!("deleting branch {}", name);
        self.run_git(&["branch", "-D", name])
    }

    fn rename(&self, old: &str, new: &str) -> Result<()> {
        log::info!("renaming branch {} to {}", old, new);
        self.run_git(&["branch", "-m", old, new])
    }

    fn create(&self, name: &str, base: &str) -> Result<()> {
        log::info!("creating branch {} off {}", name, base);
        self.run_git(&["checkout", "-b", name, base])
    }
}
