//! Router tests against an in-memory store.

use std::sync::Arc;

use vigil_models::{BoundingBox, Detection, NewDestination, ThreatClass};
use vigil_store::AlertStore;

use crate::router::EscalationRouter;
use crate::transport::{LogTransport, MockNotificationTransport, TransportError};

fn weapon(confidence: f64) -> Detection {
    Detection::with_bbox(
        ThreatClass::Weapon,
        "pistol",
        confidence,
        BoundingBox::new(0.1, 0.2, 0.4, 0.6),
    )
}

fn fire(confidence: f64) -> Detection {
    Detection::unlocalized(ThreatClass::Fire, "smoke", confidence)
}

/// Store wired with a router over the given transport, plus a plain handle
/// to the same database for assertions.
async fn wired_store(transport: Arc<dyn crate::NotificationTransport>) -> (AlertStore, AlertStore) {
    let base = AlertStore::in_memory().await.unwrap();
    let router = Arc::new(EscalationRouter::new(base.clone(), transport));
    (base.clone().with_escalator(router), base)
}

async fn wired_with_log() -> (AlertStore, AlertStore) {
    wired_store(Arc::new(LogTransport)).await
}

#[tokio::test]
async fn test_scenario_emergency_weapon_provisions_police() {
    let (store, db) = wired_with_log().await;

    let alert = store
        .record(&weapon(0.92), "img/plaza.jpg", Some("Plaza Central"))
        .await
        .unwrap();

    let police = db
        .find_emergency_destination("Plaza Central", "police")
        .await
        .unwrap()
        .expect("police destination provisioned");
    assert_eq!(police.email.as_deref(), Some("police@emergencies.gov"));
    assert_eq!(police.phone.as_deref(), Some("911"));

    let escalations = db.escalations_for_alert(alert.id).await.unwrap();
    assert_eq!(escalations.len(), 1);
    assert_eq!(escalations[0].destination_id, police.id);
    assert_eq!(escalations[0].status, "sent");
    assert_eq!(escalations[0].threat, ThreatClass::Weapon);
}

#[tokio::test]
async fn test_emergency_provisioning_is_idempotent() {
    let (store, db) = wired_with_log().await;

    let first = store
        .record(&weapon(0.9), "img/1.jpg", Some("Plaza Central"))
        .await
        .unwrap();
    let second = store
        .record(&weapon(0.85), "img/2.jpg", Some("Plaza Central"))
        .await
        .unwrap();

    // Exactly one police row despite two emergency alerts.
    assert_eq!(db.list_destinations().await.unwrap().len(), 1);

    assert_eq!(db.escalations_for_alert(first.id).await.unwrap().len(), 1);
    assert_eq!(db.escalations_for_alert(second.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_fire_provisions_fire_brigade() {
    let (store, db) = wired_with_log().await;

    store
        .record(&fire(0.88), "img/smoke.jpg", Some("Warehouse 7"))
        .await
        .unwrap();

    assert!(db
        .find_emergency_destination("Warehouse 7", "fire brigade")
        .await
        .unwrap()
        .is_some());
    assert!(db
        .find_emergency_destination("Warehouse 7", "police")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_scenario_empty_location_is_noop() {
    let (store, db) = wired_with_log().await;

    // Alert persists, but the router performs no lookup and writes nothing.
    let alert = store
        .record(&weapon(0.95), "img/a.jpg", Some(""))
        .await
        .unwrap();
    assert_eq!(db.recent_alerts(1).await.unwrap()[0].id, alert.id);
    assert!(db.recent_escalations(10).await.unwrap().is_empty());
    assert!(db.list_destinations().await.unwrap().is_empty());

    store.record(&weapon(0.95), "img/b.jpg", None).await.unwrap();
    assert!(db.recent_escalations(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_below_critical_tier_is_noop() {
    let (store, db) = wired_with_log().await;

    store
        .record(&weapon(0.49), "img/a.jpg", Some("Plaza Central"))
        .await
        .unwrap();
    assert!(db.recent_escalations(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_critical_tier_notifies_without_provisioning() {
    let (store, db) = wired_with_log().await;

    let guard = db
        .insert_destination(&NewDestination::new("Plaza Central", "Guard Post"))
        .await
        .unwrap();

    let alert = store
        .record(&weapon(0.60), "img/a.jpg", Some("Plaza Central"))
        .await
        .unwrap();

    let escalations = db.escalations_for_alert(alert.id).await.unwrap();
    assert_eq!(escalations.len(), 1);
    assert_eq!(escalations[0].destination_id, guard.id);

    // 0.60 < 0.80: no emergency service appears.
    assert!(db
        .find_emergency_destination("Plaza Central", "police")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_critical_without_destinations_writes_nothing() {
    let (store, db) = wired_with_log().await;

    store
        .record(&fire(0.6), "img/a.jpg", Some("Warehouse 7"))
        .await
        .unwrap();
    assert!(db.recent_escalations(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_vehicle_never_escalates() {
    let (store, db) = wired_with_log().await;

    db.insert_destination(&NewDestination::new("Gate 3", "Guard Post"))
        .await
        .unwrap();
    store
        .record(
            &Detection::with_bbox(
                ThreatClass::Vehicle,
                "truck",
                0.95,
                BoundingBox::new(0.0, 0.0, 0.5, 0.5),
            ),
            "img/a.jpg",
            Some("Gate 3"),
        )
        .await
        .unwrap();

    assert!(db.recent_escalations(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_aggression_notifies_but_never_provisions() {
    let (store, db) = wired_with_log().await;

    let guard = db
        .insert_destination(&NewDestination::new("Plaza Central", "Guard Post"))
        .await
        .unwrap();

    let alert = store
        .record(
            &Detection::unlocalized(ThreatClass::Aggression, "street fight", 0.85),
            "img/a.jpg",
            Some("Plaza Central"),
        )
        .await
        .unwrap();

    // Emergency tier, but aggression has no service mapping: the only
    // destination stays the configured guard post.
    assert_eq!(db.list_destinations().await.unwrap().len(), 1);
    let escalations = db.escalations_for_alert(alert.id).await.unwrap();
    assert_eq!(escalations.len(), 1);
    assert_eq!(escalations[0].destination_id, guard.id);
}

#[tokio::test]
async fn test_emergency_fans_out_to_all_active_destinations() {
    let (store, db) = wired_with_log().await;

    db.insert_destination(&NewDestination::new("Warehouse 7", "Night Watch"))
        .await
        .unwrap();

    let alert = store
        .record(&fire(0.9), "img/a.jpg", Some("Warehouse 7"))
        .await
        .unwrap();

    // Fire brigade provisioned + night watch: two rows, same alert.
    let escalations = db.escalations_for_alert(alert.id).await.unwrap();
    assert_eq!(escalations.len(), 2);
    assert!(escalations.iter().all(|e| e.alert_id == alert.id));
}

#[tokio::test]
async fn test_deactivated_destination_not_notified() {
    let (store, db) = wired_with_log().await;

    let guard = db
        .insert_destination(&NewDestination::new("Gate 3", "Guard Post"))
        .await
        .unwrap();
    db.set_destination_active(guard.id, false).await.unwrap();

    store
        .record(&weapon(0.6), "img/a.jpg", Some("Gate 3"))
        .await
        .unwrap();
    assert!(db.recent_escalations(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transport_failure_is_isolated() {
    let mut transport = MockNotificationTransport::new();
    transport
        .expect_deliver()
        .returning(|_, _| Err(TransportError::new("smtp down")));
    transport.expect_name().return_const("mock");

    let (store, db) = wired_store(Arc::new(transport)).await;

    let alert = store
        .record(&weapon(0.92), "img/a.jpg", Some("Plaza Central"))
        .await
        .expect("record must survive delivery failure");

    // The audit row is written before delivery is attempted.
    assert_eq!(db.escalations_for_alert(alert.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_transport_receives_alert_summary() {
    let mut transport = MockNotificationTransport::new();
    transport
        .expect_deliver()
        .withf(|dest, summary| {
            dest.name.to_lowercase().contains("police")
                && summary.contains("weapon")
                && summary.contains("Plaza Central")
        })
        .times(1)
        .returning(|_, _| Ok(()));
    transport.expect_name().return_const("mock");

    let (store, _db) = wired_store(Arc::new(transport)).await;

    store
        .record(&weapon(0.92), "img/a.jpg", Some("Plaza Central"))
        .await
        .unwrap();
}
