// Integration tests for usrapi-manager
// Requests go through the dispatcher to the in-memory FakeUserApi.

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use usrapi_manager::api::{FakeUserApi, UserApi};
use usrapi_manager::app::form::{FormState, UsernamePrefix};
use usrapi_manager::dispatch::{Dispatcher, drain};
use usrapi_manager::error::Operation;
use usrapi_manager::model::{Address, User};
use usrapi_manager::store::{Completion, Status, UserStore};

fn seed() -> Vec<User> {
    ["Leanne", "Ervin", "Clementine"]
        .iter()
        .zip(1u64..)
        .map(|(name, id)| User {
            id: Some(id),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "0123456789".into(),
            username: name.to_lowercase(),
            address: Address { street: "Main St".into(), city: "Springfield".into() },
            ..User::draft()
        })
        .collect()
}

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use std::{fs, path::PathBuf, time::{SystemTime, UNIX_EPOCH}};
    use usrapi_manager::app::Theme;

    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("usrapi_theme_{}_{}.conf", std::process::id(), nonce));

    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.stripe_bg), format!("{:?}", t2.stripe_bg));
    assert_eq!(format!("{:?}", t.error_fg), format!("{:?}", t2.error_fg));

    let mut p2 = PathBuf::from(&path);
    p2.set_file_name(format!("{}_init.conf", p2.file_stem().unwrap().to_string_lossy()));
    let _ = fs::remove_file(&p2);
    let _created = Theme::load_or_init(&p2);
    assert!(p2.exists());

    let _ = fs::remove_file(&path);
    let _ = fs::remove_file(&p2);
}

// 2) Full CRUD cycle against the fake resource
#[tokio::test]
async fn crud_cycle_reconciles_store_with_server() {
    let api = Arc::new(FakeUserApi::with_users(seed()));
    let (dispatcher, mut rx) = Dispatcher::new(api.clone(), Handle::current());
    let mut store = UserStore::new();

    dispatcher.load();
    store.apply(rx.recv().await.unwrap());
    assert_eq!(store.status(), Status::Ready);
    assert_eq!(store.users().len(), 3);

    store.begin_create();
    let mut form = FormState::open(store.editing().unwrap(), UsernamePrefix::DisplayOnly);
    form.values = User {
        name: "Patricia".into(),
        email: "patricia@example.com".into(),
        phone: "9876543210".into(),
        address: Address { street: "Elm".into(), city: "Shelbyville".into() },
        ..User::draft()
    };
    let mut submitted = 0;
    assert!(form.submit(|draft| {
        submitted += 1;
        dispatcher.create(draft);
    }));
    assert_eq!(submitted, 1);
    store.apply(rx.recv().await.unwrap());
    assert!(store.editing().is_none());
    assert_eq!(store.users().iter().filter(|u| u.id == Some(4)).count(), 1);

    let mut edited = store.find(2).cloned().unwrap();
    edited.name = "Ervin Howell".into();
    store.begin_edit(edited.clone());
    dispatcher.update(2, edited);
    store.apply(rx.recv().await.unwrap());
    assert_eq!(store.find(2).unwrap().name, "Ervin Howell");
    assert!(store.editing().is_none());

    dispatcher.delete(1);
    store.apply(rx.recv().await.unwrap());
    let ids: Vec<u64> = store.users().iter().filter_map(|u| u.id).collect();
    assert_eq!(ids, vec![2, 3, 4]);

    assert_eq!(api.snapshot().await, store.users().to_vec());
}

// 3) Each failing operation maps to its own static message and changes nothing
#[tokio::test]
async fn failures_map_to_static_messages() {
    let api = Arc::new(FakeUserApi::with_users(seed()));
    let (dispatcher, mut rx) = Dispatcher::new(api.clone(), Handle::current());
    let mut store = UserStore::with_users(api.list_users().await.unwrap());
    let before = store.users().to_vec();

    for op in [Operation::Fetch, Operation::Create, Operation::Update, Operation::Delete] {
        api.fail(op).await;
    }

    dispatcher.load();
    store.apply(rx.recv().await.unwrap());
    assert_eq!(store.error(), Some("Failed to fetch users"));

    dispatcher.create(User { name: "Nobody".into(), ..User::draft() });
    store.apply(rx.recv().await.unwrap());
    assert_eq!(store.error(), Some("Failed to create user"));

    dispatcher.update(3, store.find(3).cloned().unwrap());
    store.apply(rx.recv().await.unwrap());
    assert_eq!(store.error(), Some("Failed to update user"));

    dispatcher.delete(3);
    store.apply(rx.recv().await.unwrap());
    assert_eq!(store.error(), Some("Failed to delete user"));

    assert_eq!(store.users(), before.as_slice());

    // a successful reload leaves the delete failure on display
    api.recover(Operation::Fetch).await;
    store.begin_reload();
    dispatcher.load();
    store.apply(rx.recv().await.unwrap());
    assert!(!store.is_loading());
    assert_eq!(store.error(), Some("Failed to delete user"));

    store.dismiss_error();
    assert_eq!(store.status(), Status::Ready);
}

// 4) Independent requests resolve in any order; the last one processed wins
#[tokio::test]
async fn out_of_order_completions_last_processed_wins() {
    let api = Arc::new(FakeUserApi::with_users(seed()));
    let (dispatcher, mut rx) = Dispatcher::new(api.clone(), Handle::current());
    let mut store = UserStore::with_users(seed());

    api.push_delay(Duration::from_millis(150)).await;
    api.push_delay(Duration::ZERO).await;

    let mut slow = store.find(1).cloned().unwrap();
    slow.name = "slow".into();
    let mut fast = slow.clone();
    fast.name = "fast".into();

    dispatcher.update(1, slow);
    // let the first request take the long delay before the second is sent
    tokio::time::sleep(Duration::from_millis(20)).await;
    dispatcher.update(1, fast);

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    store.apply(first);
    store.apply(second);
    assert_eq!(store.find(1).unwrap().name, "slow");
    assert_eq!(drain(&mut rx, &mut store), 0);
}

// 5) Compat mode reproduces the compounding username prefix across edits
#[tokio::test]
async fn compat_prefix_compounds_through_server_round_trips() {
    let api = Arc::new(FakeUserApi::with_users(seed()));
    let (dispatcher, mut rx) = Dispatcher::new(api.clone(), Handle::current());
    let mut store = UserStore::with_users(seed());

    for _ in 0..2 {
        let user = store.find(1).cloned().unwrap();
        store.begin_edit(user.clone());
        let mut form = FormState::open(&user, UsernamePrefix::Compat);
        assert!(form.submit(|draft| dispatcher.update(1, draft)));
        store.apply(rx.recv().await.unwrap());
    }
    assert_eq!(store.find(1).unwrap().username, "USER-USER-leanne");

    let mut plain = UserStore::with_users(seed());
    for _ in 0..2 {
        let user = plain.find(2).cloned().unwrap();
        let mut form = FormState::open(&user, UsernamePrefix::DisplayOnly);
        assert!(form.submit(|draft| dispatcher.update(2, draft)));
        plain.apply(rx.recv().await.unwrap());
    }
    assert_eq!(plain.find(2).unwrap().username, "ervin");
}

// 6) A completion whose response id matches nothing leaves the store alone
#[test]
fn update_response_with_foreign_id_is_ignored() {
    let mut store = UserStore::with_users(seed());
    let stray = User { id: Some(42), name: "Stray".into(), ..User::draft() };
    store.apply(Completion::Updated { id: 3, result: Ok(stray) });
    assert_eq!(store.users(), seed().as_slice());
}
