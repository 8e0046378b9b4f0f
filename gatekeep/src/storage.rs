use gatekeep_core::Session;
use std::path::{Path, PathBuf};
use tokio::{fs, io};

/// Errors reading or writing stored state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// We had a problem with the filesystem, for example with permissions.
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// The stored data wasn't what we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The session, kept on disk between runs. The file holds `accessToken`,
/// `refreshToken`, and `user` keys.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// The session file inside a data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join("session.json"),
        }
    }

    /// Read the stored session, if there is one.
    pub async fn load(&self) -> Result<Option<Session>, Error> {
        if !fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let data = fs::read(&self.path).await?;

        Ok(Some(serde_json::from_slice(&data)?))
    }

    /// Replace whatever is stored with this session.
    pub async fn save(&self, session: &Session) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec(session)?;
        fs::write(&self.path, &data).await?;

        Ok(())
    }

    /// Forget the stored session. Not having one is fine.
    pub async fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path).await {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempdir::TempDir;

    fn session() -> Session {
        Session {
            access_token: "t1".to_string(),
            refresh_token: "t2".to_string(),
            user: json!({ "id": 1 }),
        }
    }

    #[tokio::test]
    async fn missing_file_means_no_session() {
        let dir = TempDir::new("gatekeep").unwrap();

        let loaded = SessionFile::in_dir(dir.path()).load().await.unwrap();

        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn saved_sessions_load_again() {
        let dir = TempDir::new("gatekeep").unwrap();
        let file = SessionFile::in_dir(&dir.path().join("nested"));

        file.save(&session()).await.unwrap();

        assert_eq!(file.load().await.unwrap(), Some(session()));
    }

    #[tokio::test]
    async fn clearing_twice_is_fine() {
        let dir = TempDir::new("gatekeep").unwrap();
        let file = SessionFile::in_dir(dir.path());

        file.save(&session()).await.unwrap();
        file.clear().await.unwrap();
        file.clear().await.unwrap();

        assert_eq!(file.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn garbage_is_an_error() {
        let dir = TempDir::new("gatekeep").unwrap();
        std::fs::write(dir.path().join("session.json"), b"{").unwrap();

        let err = SessionFile::in_dir(dir.path()).load().await.unwrap_err();

        assert!(matches!(err, Error::Json(_)));
    }
}
