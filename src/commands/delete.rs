//! Delete command handler.

use crate::args::DeleteArgs;
use crate::commands::{plural, Out};
use crate::model::DonationId;
use crate::{Config, Result};
use tracing::warn;

/// Deletes one or more donations by id atomically.
///
/// All deletions are committed together: if the store fails part way, none of them take effect.
/// Ids that do not exist are skipped and reported with a warning.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<Vec<DonationId>>> {
    let deleted = config.db().delete(args.ids()).await?;

    for id in args.ids().iter().filter(|id| !deleted.contains(id)) {
        warn!("Donation {id} was not found");
    }

    let count = deleted.len();
    let message = format!("Deleted {} donation{}", count, plural(count));
    Ok(Out::new(message, deleted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete_one() {
        let env = TestEnv::new().await;
        let keep = env.insert_test_donation("Keep Me", "10", 1).await;
        let gone = env.insert_test_donation("Delete Me", "20", 2).await;

        let out = delete(env.config(), DeleteArgs::new([gone.id()]))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 1 donation");
        assert_eq!(out.structure().unwrap(), &vec![gone.id()]);

        let remaining = env.config().db().list().await.unwrap();
        assert_eq!(remaining, vec![keep]);
    }

    #[tokio::test]
    async fn test_delete_several() {
        let env = TestEnv::new().await;
        let a = env.insert_test_donation("A", "1", 1).await;
        let b = env.insert_test_donation("B", "2", 2).await;

        let out = delete(env.config(), DeleteArgs::new([a.id(), b.id()]))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 2 donations");
        assert_eq!(env.config().db().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_skipped() {
        let env = TestEnv::new().await;
        let a = env.insert_test_donation("A", "1", 1).await;

        let out = delete(env.config(), DeleteArgs::new([DonationId::new()]))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 0 donations");
        assert!(out.structure().unwrap().is_empty());
        assert_eq!(env.config().db().list().await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn test_delete_on_closed_store_fails() {
        let env = TestEnv::new().await;
        let a = env.insert_test_donation("A", "1", 1).await;
        env.config().db().close().await;

        let err = delete(env.config(), DeleteArgs::new([a.id()]))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::StorageFailure(_)));
    }
}
