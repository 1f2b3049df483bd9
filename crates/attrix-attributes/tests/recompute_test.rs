//! Integration tests for audit-driven recomputation and announcements.

mod common;

use attrix_attributes::{
    Attribute, EventTag, ExternalIdentitySource, Principal, SourceKind, ValueType,
    BONA_FIDE_MARKER,
};
use attrix_core::{ExtSourceId, PrincipalId};
use attrix_events::wire::{all_removed_message, set_message};
use attrix_events::{AnnouncementKind, AnnouncementPublisher, ChannelPublisher, EntityKind};
use common::{
    definition, removed_for_principal, set_for_ext_source, set_for_principal, TestContext,
    EXT_SOURCE_SEGMENT, PRINCIPAL_ID, PRINCIPAL_SEGMENT,
};

mod classification_tests {
    use super::*;

    #[tokio::test]
    async fn test_bulk_removal_for_principal() {
        let ctx = TestContext::new().await;
        let tags = ctx
            .module
            .classify("All attributes removed for Principal:[id=42].");
        assert_eq!(tags.len(), 1);
        assert!(tags.contains(&EventTag::AllAttributesRemoved {
            entity: EntityKind::Principal
        }));
    }

    #[tokio::test]
    async fn test_unrelated_line_is_ignored() {
        let ctx = TestContext::new().await;
        assert!(ctx.module.classify("unrelated log line").is_empty());
        assert!(ctx.module.on_event("unrelated log line").await.is_empty());
        assert_eq!(ctx.store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_configured_status_name_drives_classification() {
        let ctx = TestContext::new().await;
        let tags = ctx
            .module
            .classify(&set_for_principal(&ctx.config.status_source, "granted"));
        assert!(tags.contains(&EventTag::SourceValueSet {
            entity: EntityKind::Principal,
            source: SourceKind::Status,
        }));
    }
}

mod announcement_tests {
    use super::*;

    #[tokio::test]
    async fn test_status_set_with_empty_result_announces_removal() {
        let ctx = TestContext::new().await;
        let announcements = ctx
            .module
            .on_event(&set_for_principal("elixirBonaFideStatusREMS", "x"))
            .await;

        assert_eq!(announcements.len(), 1);
        let announcement = &announcements[0];
        assert_eq!(announcement.kind, AnnouncementKind::Removed);
        assert_eq!(announcement.principal_id, PrincipalId::new(PRINCIPAL_ID));
        assert!(announcement.text.starts_with("AttributeDefinition:["));
        assert!(announcement.text.contains("name=<bonaFideStatus>"));
        assert!(announcement
            .text
            .ends_with(&format!(" removed for {PRINCIPAL_SEGMENT}.")));
    }

    #[tokio::test]
    async fn test_qualified_principal_announces_marker() {
        let ctx = TestContext::new().await;
        ctx.set_status("granted").await;
        let announcements = ctx
            .module
            .on_event(&set_for_principal("elixirBonaFideStatusREMS", "granted"))
            .await;

        assert_eq!(announcements.len(), 1);
        assert_eq!(announcements[0].kind, AnnouncementKind::Set);
        assert!(announcements[0]
            .text
            .contains(&format!("value=<{BONA_FIDE_MARKER}>")));
        assert!(announcements[0]
            .text
            .ends_with(&format!(" set for {PRINCIPAL_SEGMENT}.")));
    }

    #[tokio::test]
    async fn test_announcement_reflects_state_at_each_event() {
        let ctx = TestContext::new().await;

        ctx.set_status("granted").await;
        ctx.module
            .dispatch(&set_for_principal("elixirBonaFideStatusREMS", "granted"), &ctx.publisher)
            .await;

        ctx.clear_status().await;
        ctx.module
            .dispatch(&removed_for_principal("elixirBonaFideStatusREMS"), &ctx.publisher)
            .await;

        let published = ctx.publisher.published().await;
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].kind, AnnouncementKind::Set);
        assert_eq!(published[1].kind, AnnouncementKind::Removed);
    }

    #[tokio::test]
    async fn test_unchanged_value_is_announced_again() {
        let ctx = TestContext::new().await;
        ctx.set_counts(&[("ELIXIR", "1")]).await;
        let line = set_for_principal("publications", "{ELIXIR:1,}");
        assert_eq!(ctx.module.dispatch(&line, &ctx.publisher).await, 1);
        assert_eq!(ctx.module.dispatch(&line, &ctx.publisher).await, 1);
        assert_eq!(ctx.publisher.count().await, 2);
    }

    #[tokio::test]
    async fn test_multi_tag_line_emits_once() {
        let ctx = TestContext::new().await;
        let line = format!(
            "{} All attributes removed for {PRINCIPAL_SEGMENT}.",
            removed_for_principal("publications")
        );
        assert!(ctx.module.classify(&line).len() >= 2);
        assert_eq!(ctx.module.on_event(&line).await.len(), 1);
    }
}

mod identity_tests {
    use super::*;

    #[tokio::test]
    async fn test_principal_text_in_value_does_not_redirect_recompute() {
        let ctx = TestContext::new().await;
        ctx.directory
            .insert(Principal::new(PrincipalId::new(7), "Other"))
            .await;
        ctx.set_status("granted").await;

        let changed = Attribute::with_value(
            definition(10, ctx.config.status_ref(), ValueType::String),
            "see Principal:[id=<7".into(),
        );
        let line = set_message(&changed, &ctx.principal);

        let announcements = ctx.module.on_event(&line).await;
        assert_eq!(announcements.len(), 1);
        assert_eq!(announcements[0].principal_id, PrincipalId::new(PRINCIPAL_ID));
        assert_eq!(announcements[0].kind, AnnouncementKind::Set);
        assert!(announcements[0]
            .text
            .ends_with(&format!(" set for {PRINCIPAL_SEGMENT}.")));
    }

    #[tokio::test]
    async fn test_ext_source_event_resolves_owner() {
        let ctx = TestContext::new().await;
        ctx.set_affiliations(&["faculty@uni.example"]).await;
        let line = set_for_ext_source("affiliation", "[faculty@uni.example,]");

        assert!(ctx.module.classify(&line).contains(&EventTag::SourceValueSet {
            entity: EntityKind::ExternalIdentitySource,
            source: SourceKind::Affiliation,
        }));

        let announcements = ctx.module.on_event(&line).await;
        assert_eq!(announcements.len(), 1);
        assert_eq!(announcements[0].principal_id, PrincipalId::new(PRINCIPAL_ID));
        assert_eq!(announcements[0].kind, AnnouncementKind::Set);
    }

    #[tokio::test]
    async fn test_ext_source_bulk_removal_resolves_owner() {
        let ctx = TestContext::new().await;
        let ues = ExternalIdentitySource {
            id: ExtSourceId::new(7),
            principal_id: PrincipalId::new(PRINCIPAL_ID),
            source: "https://idp.example.org".to_string(),
            login: "jane@example.org".to_string(),
        };
        let line = all_removed_message(&ues);
        assert_eq!(line, format!("All attributes removed for {EXT_SOURCE_SEGMENT}."));

        let announcements = ctx.module.on_event(&line).await;
        assert_eq!(announcements.len(), 1);
        assert_eq!(announcements[0].kind, AnnouncementKind::Removed);
    }

    #[tokio::test]
    async fn test_unknown_principal_emits_nothing() {
        let ctx = TestContext::new().await;
        let line = "All attributes removed for Principal:[id=<9999>, uuid=<u>, displayName=<Nobody>].";
        assert!(ctx.module.on_event(line).await.is_empty());
        assert_eq!(ctx.store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_message_without_principal_emits_nothing() {
        let ctx = TestContext::new().await;
        let line = "All attributes removed for Principal:[].";
        assert!(ctx.module.on_event(line).await.is_empty());
    }
}

#[tokio::test]
async fn test_dispatch_through_channel() {
    let ctx = TestContext::new().await;
    let (publisher, mut rx) = ChannelPublisher::bounded("bonafide", 8);
    ctx.set_affiliations(&["faculty@uni.example"]).await;

    let published = ctx
        .module
        .dispatch(&set_for_principal("publications", "{}"), &publisher)
        .await;

    assert_eq!(published, 1);
    let text = rx.recv().await.unwrap();
    assert!(text.contains(&format!("value=<{BONA_FIDE_MARKER}>")));
}

#[tokio::test]
async fn test_dispatch_into_full_channel_publishes_nothing() {
    let ctx = TestContext::new().await;
    let (publisher, _rx) = ChannelPublisher::bounded("bonafide", 1);
    publisher
        .publish(&ctx.module.on_event(&removed_for_principal("publications")).await[0])
        .await
        .unwrap();

    let published = ctx
        .module
        .dispatch(&removed_for_principal("publications"), &publisher)
        .await;
    assert_eq!(published, 0);
}
