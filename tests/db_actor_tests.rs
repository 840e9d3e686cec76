use prism::PrismError;
use prism::db::{NewChatRecord, NewUser};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;
use tokio::fs;

fn temp_database_url(tag: &str) -> (String, std::path::PathBuf) {
    let tmp_dir = std::env::temp_dir();
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    let db_path = tmp_dir.join(format!("prism_{tag}_{}.sqlite", hasher.finish()));
    (format!("sqlite:{}", db_path.to_str().unwrap()), db_path)
}

#[tokio::test]
async fn db_actor_baseline() {
    let (database_url, db_path) = temp_database_url("db_actor");
    let db = prism::db::spawn(&database_url).await;

    // 1. Fresh store: no user, no sessions.
    assert!(db.find_user("alice").await.unwrap().is_none());
    assert!(db.list_sessions(1).await.unwrap().is_empty());

    // 2. Create a user; ids start from 1.
    let alice_id = db
        .create_user(NewUser {
            username: "alice".to_string(),
            password_hash: "$argon2id$fake".to_string(),
        })
        .await
        .unwrap();
    assert!(alice_id > 0);

    let alice = db.find_user("alice").await.unwrap().expect("alice missing");
    assert_eq!(alice.id, alice_id);
    assert_eq!(alice.username, "alice");
    assert_eq!(alice.password_hash, "$argon2id$fake");

    // 3. Re-registering the same username fails and leaves the original row
    //    untouched. Usernames are case-sensitive, so "Alice" is distinct.
    let duplicate = db
        .create_user(NewUser {
            username: "alice".to_string(),
            password_hash: "$argon2id$other".to_string(),
        })
        .await;
    assert!(matches!(
        duplicate,
        Err(PrismError::DuplicateUsername(ref name)) if name == "alice"
    ));
    let alice_after = db.find_user("alice").await.unwrap().expect("alice missing");
    assert_eq!(alice_after, alice);

    db.create_user(NewUser {
        username: "Alice".to_string(),
        password_hash: "$argon2id$case".to_string(),
    })
    .await
    .expect("case-different username should register");

    // 4. Append exchanges across two sessions; interleave so that session
    //    "early" finishes before "late" does.
    let append = |session: &str, prompt: &str| {
        let db = db.clone();
        let session = session.to_string();
        let prompt = prompt.to_string();
        async move {
            db.append_chat(NewChatRecord {
                user_id: alice_id,
                session_id: session,
                prompt,
                response: "ok".to_string(),
                model_used: "stub-model".to_string(),
            })
            .await
            .unwrap()
        }
    };

    let id1 = append("early", "first").await;
    let id2 = append("early", "second").await;
    let id3 = append("late", "other session").await;
    let id4 = append("early", "third").await;
    assert!(id1 < id2 && id2 < id3 && id3 < id4, "ids must increase in insertion order");

    // 5. History replays one (user, session) in insertion order.
    let history = db.session_history(alice_id, "early").await.unwrap();
    assert_eq!(history.len(), 3);
    let prompts: Vec<&str> = history.iter().map(|r| r.prompt.as_str()).collect();
    assert_eq!(prompts, ["first", "second", "third"]);
    assert!(
        history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
        "timestamps must be non-decreasing"
    );
    assert!(history.iter().all(|r| r.model_used == "stub-model"));

    // 6. Sessions are ordered by latest activity: "early" got the last
    //    append, so it comes first.
    let sessions = db.list_sessions(alice_id).await.unwrap();
    assert_eq!(sessions, ["early", "late"]);

    // 7. Other users see nothing of alice's history.
    assert!(db.session_history(alice_id + 1000, "early").await.unwrap().is_empty());
    assert!(db.list_sessions(alice_id + 1000).await.unwrap().is_empty());

    // 8. Unknown session id yields an empty, not an error.
    assert!(db.session_history(alice_id, "nope").await.unwrap().is_empty());

    let _ = fs::remove_file(&db_path).await;
}
