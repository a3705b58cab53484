use client::{ApiClient, ApiError, CategoryFilter, ErrorKind, TaskApi, TaskController};
use common::{Category, CreateTaskPayload, UpdateTaskPayload};
use serde_json::json;
use server::{database, routes::create_router};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts the real router on an ephemeral port and returns its API root.
async fn spawn_server() -> String {
    let pool = database::establish_in_memory_pool()
        .await
        .expect("Failed to set up in-memory SQLite");
    let app = create_router(pool);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/api")
}

#[tokio::test]
async fn test_crud_against_live_server() {
    let api = ApiClient::new(spawn_server().await);

    let created = api
        .create_task(
            &CreateTaskPayload::new("Buy milk")
                .description("Semi-skimmed")
                .category(Category::Shopping),
        )
        .await
        .unwrap();

    let fetched = api.get_task(created.id).await.unwrap();
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.description, created.description);
    assert_eq!(fetched.category, created.category);
    assert_eq!(fetched.completed, created.completed);

    let updated = api
        .update_task(created.id, &UpdateTaskPayload::default().completed(true))
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.description, "Semi-skimmed");

    api.delete_task(created.id).await.unwrap();
    let err = api.get_task(created.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(api.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_message_is_surfaced() {
    let api = ApiClient::new(spawn_server().await);

    let err = api
        .create_task(&CreateTaskPayload::new("   "))
        .await
        .unwrap_err();

    match err {
        ApiError::Validation(message) => assert_eq!(message, "Title cannot be empty."),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_controller_against_live_server() {
    let api = ApiClient::new(spawn_server().await);
    api.create_task(&CreateTaskPayload::new("Gym").category(Category::Health))
        .await
        .unwrap();

    let controller = TaskController::init(api).await;
    assert!(!controller.is_loading());
    assert_eq!(controller.tasks().len(), 1);

    let milk = controller
        .add_task(CreateTaskPayload::new("Buy milk").category(Category::Shopping))
        .await
        .unwrap();
    assert_eq!(controller.tasks()[0].id, milk.id);

    controller.set_category_filter(CategoryFilter::Only(Category::Health));
    let visible = controller.visible_tasks();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Gym");

    let completed = controller.toggle_complete(milk.id, true).await.unwrap();
    assert!(completed.completed);
    assert!(controller.tasks().iter().any(|task| task.id == milk.id && task.completed));

    controller.delete_task(milk.id).await.unwrap();
    assert_eq!(controller.tasks().len(), 1);
}

#[tokio::test]
async fn test_server_errors_are_infrastructure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Something went wrong!" })),
        )
        .mount(&mock_server)
        .await;

    let api = ApiClient::new(format!("{}/api", mock_server.uri()));
    let err = api.list_tasks().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Infrastructure);
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Something went wrong!");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_without_body_uses_status_reason() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/7"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = ApiClient::new(format!("{}/api", mock_server.uri()));
    let err = api.delete_task(7).await.unwrap_err();

    match err {
        ApiError::NotFound(message) => assert_eq!(message, "Not Found"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(format!("http://{addr}/api"));
    let err = api.list_tasks().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.kind(), ErrorKind::Infrastructure);
}
