//! Property tests for the in-memory todo store.

use std::collections::HashSet;

use proptest::prelude::*;
use todo_store::domain::todo::CreateTodo;
use todo_store::{Caller, InMemoryTodoRepository, TodoError, TodoService, TodoServiceImpl};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

proptest! {
    #[test]
    fn list_returns_creations_in_order(titles in prop::collection::vec(".{0,24}", 0..40)) {
        let listed = runtime().block_on(async {
            let store = TodoServiceImpl::anonymous(InMemoryTodoRepository::new());
            for title in &titles {
                store.create(CreateTodo { title: title.clone() }, None).await.unwrap();
            }
            store.list(None).await.unwrap()
        });

        prop_assert_eq!(listed.len(), titles.len());
        for (todo, title) in listed.iter().zip(&titles) {
            prop_assert_eq!(&todo.title, title);
            prop_assert!(!todo.completed);
        }
    }

    #[test]
    fn owners_only_see_their_own(owners in prop::collection::vec(0usize..3, 1..30)) {
        let callers: Vec<Caller> = (0..3).map(|i| Caller::new(format!("user{i}"), format!("User {i}"))).collect();
        runtime().block_on(async {
            let store = TodoServiceImpl::owned(InMemoryTodoRepository::new());
            for (n, owner) in owners.iter().enumerate() {
                store.create(CreateTodo { title: format!("todo {n}") }, Some(&callers[*owner])).await.unwrap();
            }
            for (i, caller) in callers.iter().enumerate() {
                let mine = store.list(Some(caller)).await.unwrap();
                assert_eq!(mine.len(), owners.iter().filter(|o| **o == i).count());
                assert!(mine.iter().all(|t| t.owner_id.as_ref() == Some(&caller.id)));
            }
        });
    }

    #[test]
    fn foreign_mutations_never_change_the_record(title in ".{0,24}", completed in any::<bool>()) {
        let outcome = runtime().block_on(async {
            let owner = Caller::new("user1", "User One");
            let intruder = Caller::new("user2", "User Two");
            let store = TodoServiceImpl::owned(InMemoryTodoRepository::new());
            let id = store.create(CreateTodo { title: "original".into() }, Some(&owner)).await.unwrap();

            let update = store.update(&id, title, Some(&intruder.id)).await.map(|_| ());
            let toggle = store.set_completed(&id, completed, Some(&intruder.id)).await.map(|_| ());
            let delete = store.delete(&id, Some(&intruder.id)).await;
            let after = store.get(&id, Some(&owner.id)).await.unwrap();
            (update, toggle, delete, after)
        });

        let (update, toggle, delete, after) = outcome;
        let rejected = |r: &Result<(), TodoError>| matches!(r, Err(TodoError::OwnershipMismatch { .. }));
        prop_assert!(rejected(&update), "foreign update was accepted");
        prop_assert!(rejected(&toggle), "foreign toggle was accepted");
        prop_assert!(rejected(&delete), "foreign delete was accepted");
        prop_assert_eq!(after.title, "original");
        prop_assert!(!after.completed);
    }
}

#[tokio::test]
async fn ids_are_unique_across_ten_thousand_creations() {
    let store = TodoServiceImpl::anonymous(InMemoryTodoRepository::new());
    let mut seen = HashSet::new();
    for n in 0..10_000 {
        let id = store.create(CreateTodo { title: format!("todo {n}") }, None).await.unwrap();
        assert!(seen.insert(id), "duplicate id {id}");
    }
    assert_eq!(store.list(None).await.unwrap().len(), 10_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_leave_a_whole_record() {
    let store = TodoServiceImpl::anonymous(InMemoryTodoRepository::new());
    let id = store.create(CreateTodo { title: "shared".into() }, None).await.unwrap();

    let mut tasks = Vec::new();
    for n in 0..32 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            if n % 2 == 0 {
                store.update(&id, format!("title {n}"), None).await.map(|_| ())
            } else {
                store.set_completed(&id, n % 4 == 1, None).await.map(|_| ())
            }
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let todos = store.list(None).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert!(todos[0].title.starts_with("title "));
}
