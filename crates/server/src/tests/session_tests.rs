use super::*;
use axum::http::HeaderValue;

fn edited_form(session: &SessionState) -> HashMap<String, String> {
    [
        (Field::Age, "45"),
        (Field::Income, "800000"),
        (Field::LoanAmount, "100000"),
        (Field::LoanTenureMonths, "12"),
        (Field::AvgDpdPerDelinquency, "3"),
        (Field::DelinquencyRatio, "80"),
        (Field::CreditUtilizationRatio, "90"),
        (Field::NumOpenAccounts, "4"),
        (Field::ResidenceType, "Mortgage"),
        (Field::LoanPurpose, "Personal"),
        (Field::LoanType, "Secured"),
    ]
    .into_iter()
    .map(|(field, value)| (session.field_key(field), value.to_string()))
    .collect()
}

#[test]
fn storage_keys_carry_the_reset_epoch() {
    let mut session = SessionState::new();
    assert_eq!(session.field_key(Field::Age), "age_0");
    session.reset();
    assert_eq!(session.field_key(Field::Age), "age_1");
    assert_eq!(session.field_key(Field::CreditUtilizationRatio), "credit_util_1");
}

#[test]
fn form_edits_are_read_back() {
    let mut session = SessionState::new();
    let form = edited_form(&session);
    session.apply_form(&form);

    let input = session.application();
    assert_eq!(input.age, 45);
    assert_eq!(input.income, 800_000.0);
    assert_eq!(input.num_open_accounts, 4);
    assert_eq!(input.residence_type, shared::domain::ResidenceType::Mortgage);
    assert_eq!(input.loan_type, shared::domain::LoanType::Secured);
}

#[test]
fn reset_twice_restores_every_default() {
    let mut session = SessionState::new();
    let form = edited_form(&session);
    session.apply_form(&form);
    assert_ne!(session.application(), ApplicationInput::default());

    session.reset();
    session.reset();

    assert_eq!(session.reset_epoch(), 2);
    assert_eq!(session.application(), ApplicationInput::default());
}

#[test]
fn stale_form_is_ignored_after_reset() {
    let mut session = SessionState::new();
    let stale = edited_form(&session);
    session.reset();
    session.apply_form(&stale);
    assert_eq!(session.application(), ApplicationInput::default());
}

#[test]
fn unparseable_value_keeps_previous_value() {
    let mut session = SessionState::new();
    assert!(session.set(Field::Income, "500000"));
    assert!(!session.set(Field::Income, "lots"));
    assert_eq!(session.value(Field::Income), WidgetValue::Number(500_000.0));
}

#[test]
fn session_state_serializes() {
    let mut session = SessionState::new();
    session.set(Field::Age, "33");
    let json = serde_json::to_string(&session).expect("json");
    let back: SessionState = serde_json::from_str(&json).expect("json");
    assert_eq!(back, session);
}

#[tokio::test]
async fn checkout_reuses_known_sessions() {
    let store = SessionStore::new(Duration::seconds(60));
    let (id, first) = store.checkout(None).await;
    first.lock().await.set(Field::Age, "50");

    let (same_id, again) = store.checkout(Some(id)).await;
    assert_eq!(same_id, id);
    assert_eq!(again.lock().await.value(Field::Age), WidgetValue::Integer(50));

    let (other_id, _) = store.checkout(Some(Uuid::new_v4())).await;
    assert_ne!(other_id, id);
    assert_eq!(store.session_count().await, 2);
}

#[tokio::test]
async fn idle_sessions_are_evicted() {
    let store = SessionStore::new(Duration::seconds(60));
    let start = Utc::now();
    let (id, _) = store.checkout_at(None, start).await;

    let later = start + Duration::seconds(120);
    let (new_id, session) = store.checkout_at(Some(id), later).await;
    assert_ne!(new_id, id);
    assert_eq!(session.lock().await.reset_epoch(), 0);
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn lookup_never_creates_sessions() {
    let store = SessionStore::new(Duration::seconds(60));
    assert!(store.lookup(None).await.is_none());
    assert!(store.lookup(Some(Uuid::new_v4())).await.is_none());
    assert_eq!(store.session_count().await, 0);

    let (id, _) = store.checkout(None).await;
    let (found, _) = store.lookup(Some(id)).await.expect("known session");
    assert_eq!(found, id);
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn lookup_keeps_session_alive() {
    let store = SessionStore::new(Duration::seconds(60));
    let start = Utc::now();
    let (id, _) = store.checkout_at(None, start).await;

    let touched = start + Duration::seconds(50);
    assert!(store.lookup_at(Some(id), touched).await.is_some());

    let later = touched + Duration::seconds(50);
    assert!(store.lookup_at(Some(id), later).await.is_some());
    assert!(store
        .lookup_at(Some(id), later + Duration::seconds(61))
        .await
        .is_none());
}

#[test]
fn session_id_is_read_from_cookie_header() {
    let id = Uuid::new_v4();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={id}")).expect("header"),
    );
    assert_eq!(session_id_from_headers(&headers), Some(id));

    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_static("credit_risk_session=nope"));
    assert_eq!(session_id_from_headers(&headers), None);
}

#[test]
fn session_cookie_is_http_only() {
    let id = Uuid::new_v4();
    let cookie = session_cookie(id);
    let cookie = cookie.to_str().expect("ascii");
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE}={id}")));
    assert!(cookie.contains("HttpOnly"));
}
