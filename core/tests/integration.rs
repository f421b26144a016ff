//! List controller driven over real HTTP against the mock server.
//!
//! # Design
//! Starts the mock server on a random port in its own thread and runtime,
//! then drives `ListController` through `HttpFacade` + `UreqTransport`.
//! Validates request building, response parsing and reconciliation
//! end-to-end, and catches schema drift between the two crates.

use mock_server::ServerConfig;
use todo_core::{ApiError, HttpFacade, ListController, RemoteFacade};

/// Start the mock server on a random port and return its base URL.
fn spawn_server(config: ServerConfig) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, config).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn yes(_: &str) -> bool {
    true
}

#[tokio::test]
async fn controller_lifecycle_over_http() {
    let base_url = spawn_server(ServerConfig {
        seed: true,
        ..ServerConfig::default()
    });
    let controller = ListController::new(HttpFacade::connect(&base_url), yes);

    // Step 1: initial load shows the demo items.
    controller.refresh().await.unwrap();
    let items = controller.items().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].description, "say hello");
    assert_eq!(items[1].description, "say hello again");

    // Step 2: complete the first.
    controller.complete(&items[0]).await.unwrap();
    let after_complete = controller.items().await;
    assert!(after_complete[0].is_done);
    assert!(!after_complete[1].is_done);

    // Step 3: bulk removal only hides it locally.
    assert!(controller.remove_all_completed().await);
    assert_eq!(controller.items().await, vec![after_complete[1].clone()]);
    controller.refresh().await.unwrap();
    assert_eq!(controller.items().await, after_complete);

    // Step 4: remove it for real, twice.
    let done_id = after_complete[0].id;
    controller.remove_one(done_id).await.unwrap();
    controller.remove_one(done_id).await.unwrap();
    assert_eq!(controller.items().await, vec![after_complete[1].clone()]);

    // Step 5: add a new one.
    controller.set_pending_text("Integration test").await;
    assert!(controller.submit_new().await.unwrap());
    let items = controller.items().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].description, "Integration test");
    assert!(!items[1].is_done);
    assert_eq!(controller.pending_text().await, "");
    assert!(controller.notice().await.is_none());
}

#[tokio::test]
async fn update_of_deleted_item_surfaces_not_found() {
    let base_url = spawn_server(ServerConfig {
        seed: true,
        ..ServerConfig::default()
    });
    let facade = HttpFacade::connect(&base_url);
    let todo = facade.list().await.unwrap().remove(0);
    facade.delete(todo.id).await.unwrap();

    let err = facade.update(&todo.completed()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn unreachable_server_leaves_items_and_raises_notice() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let controller = ListController::new(HttpFacade::connect(&format!("http://{addr}")), yes);

    let err = controller.refresh().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(controller.items().await.is_empty());
    assert!(controller.notice().await.is_some());
}
