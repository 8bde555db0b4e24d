use folio_client::{
    api::{Comment, NewComment},
    Notice, Session,
};
use folio_mock_server::MockStore;

fn messages(s: &Session<MockStore>) -> Vec<&str> {
    s.view().iter().map(|c| &c.message as &str).collect()
}

fn seeded(messages: &[&str]) -> MockStore {
    let store = MockStore::new();
    for m in messages {
        store.post(m);
    }
    store
}

#[tokio::test]
async fn refresh_shows_newest_first_up_to_limit() {
    let mut s = Session::new(seeded(&["one", "two", "three", "four"]));
    s.refresh(3).await;
    assert_eq!(messages(&s), vec!["four", "three", "two"]);
    s.refresh(10).await;
    assert_eq!(messages(&s), vec!["four", "three", "two", "one"]);
    assert_eq!(s.controller().limit(), Some(10));
    assert!(!s.controller().is_busy());
}

#[tokio::test]
async fn deleting_one_keeps_the_others() {
    let store = seeded(&["hi"]);
    let bye = store.post("bye");
    let mut s = Session::new(store);
    s.refresh(5).await;
    assert_eq!(messages(&s), vec!["bye", "hi"]);

    let target = s.view().iter().find(|c| c.id == bye).cloned().unwrap();
    s.delete_one(&target).await;
    assert_eq!(messages(&s), vec!["hi"]);
    assert_eq!(s.store().server().test_num_comments(), 1);

    // a fresh listing agrees with the optimistic view
    s.refresh(5).await;
    assert_eq!(messages(&s), vec!["hi"]);
    assert!(s.view().iter().all(|c| c.id != bye));
    assert_eq!(s.controller().notice(), None);
}

#[tokio::test]
async fn zero_limit_empties_without_listing() {
    let store = seeded(&["a", "b"]);
    let mut s = Session::new(store.clone());
    s.refresh(2).await;
    assert_eq!(s.view().len(), 2);

    // a listing would fail, but none is sent
    store.fail_lists(1);
    s.refresh(0).await;
    assert!(s.view().is_empty());
    assert_eq!(s.controller().notice(), None);
    s.refresh(1).await;
    assert!(s.controller().notice().is_some());
}

#[tokio::test]
async fn delete_all_is_idempotent() {
    let mut s = Session::new(seeded(&["a", "b", "c"]));
    s.refresh(10).await;
    for _ in 0..2 {
        s.delete_all().await;
        assert!(s.view().is_empty());
        assert_eq!(s.store().server().test_num_comments(), 0);
        assert_eq!(s.controller().notice(), None);
    }
    s.refresh(10).await;
    assert!(s.view().is_empty());
}

#[tokio::test]
async fn failed_listing_keeps_previous_view() {
    let store = seeded(&["a", "b"]);
    let mut s = Session::new(store.clone());
    s.refresh(10).await;
    store.post("c");

    store.fail_lists(1);
    s.refresh(10).await;
    assert_eq!(messages(&s), vec!["b", "a"]);
    assert!(matches!(
        s.controller().notice(),
        Some(Notice::RefreshFailed(_))
    ));

    // the next successful listing clears the notice
    s.refresh(10).await;
    assert_eq!(messages(&s), vec!["c", "b", "a"]);
    assert_eq!(s.controller().notice(), None);
}

#[tokio::test]
async fn failed_delete_brings_comment_back() {
    let store = seeded(&["a", "b"]);
    let mut s = Session::new(store.clone());
    s.refresh(10).await;

    store.fail_deletes(1);
    let target: Comment = s.view().as_slice()[0].clone();
    s.delete_one(&target).await;

    // the reconciliation listing restored it
    assert_eq!(messages(&s), vec!["b", "a"]);
    assert!(!s.controller().is_stale());
    match s.controller().notice() {
        Some(Notice::DeleteFailed { id, .. }) => assert_eq!(*id, target.id),
        n => panic!("unexpected notice {n:?}"),
    }
}

#[tokio::test]
async fn failed_delete_all_brings_comments_back() {
    let store = seeded(&["a", "b", "c"]);
    let mut s = Session::new(store.clone());
    s.refresh(2).await;

    store.fail_delete_alls(1);
    s.delete_all().await;
    assert_eq!(messages(&s), vec!["c", "b"]);
    assert!(matches!(
        s.controller().notice(),
        Some(Notice::DeleteAllFailed(_))
    ));
}

#[tokio::test]
async fn failed_reconciliation_leaves_view_stale() {
    let store = seeded(&["a", "b"]);
    let mut s = Session::new(store.clone());
    s.refresh(10).await;

    store.fail_deletes(1);
    store.fail_lists(1);
    let target = s.view().as_slice()[1].clone();
    s.delete_one(&target).await;
    assert_eq!(messages(&s), vec!["b"]);
    assert!(s.controller().is_stale());
    assert!(matches!(
        s.controller().notice(),
        Some(Notice::RefreshFailed(_))
    ));

    s.refresh(10).await;
    assert_eq!(messages(&s), vec!["b", "a"]);
    assert!(!s.controller().is_stale());
}

#[tokio::test]
async fn delete_before_any_listing_only_marks_stale() {
    let store = seeded(&["a"]);
    let id = store.server().test_get_comment_id(0).unwrap();
    let mut s = Session::new(store.clone());

    store.fail_deletes(1);
    s.delete_one(&Comment {
        id,
        message: String::from("a"),
    })
    .await;
    assert!(s.view().is_empty());
    assert!(s.controller().is_stale());
    assert_eq!(store.server().test_num_comments(), 1);
}

fn contact_form(message: &str) -> NewComment {
    NewComment {
        name: String::from("Grace"),
        email: String::from("grace@example.org"),
        subject: String::from("Hi"),
        message: String::from(message),
    }
}

#[tokio::test]
async fn posted_comment_shows_up_first() {
    let mut s = Session::new(seeded(&["a", "b"]));
    s.refresh(2).await;
    s.post_comment(&contact_form("c")).await;
    assert_eq!(messages(&s), vec!["c", "b"]);
    assert_eq!(s.controller().notice(), None);
    assert!(!s.controller().is_busy());
}

#[tokio::test]
async fn incomplete_contact_form_is_not_sent() {
    let store = seeded(&["a"]);
    let mut s = Session::new(store.clone());
    s.refresh(5).await;

    let mut form = contact_form("b");
    form.email.clear();
    // a listing would fail, but neither the form nor a listing is sent
    store.fail_lists(1);
    s.post_comment(&form).await;
    assert_eq!(messages(&s), vec!["a"]);
    assert_eq!(store.server().test_num_comments(), 1);
    assert!(matches!(
        s.controller().notice(),
        Some(Notice::PostFailed(_))
    ));
}

#[tokio::test]
async fn failed_post_keeps_view() {
    let store = seeded(&["a"]);
    let mut s = Session::new(store.clone());
    s.refresh(5).await;

    store.fail_posts(1);
    s.post_comment(&contact_form("b")).await;
    assert_eq!(messages(&s), vec!["a"]);
    assert_eq!(store.server().test_num_comments(), 1);
    assert!(matches!(
        s.controller().notice(),
        Some(Notice::PostFailed(_))
    ));
}
