//! End-to-end flows through the gate and the services against an in-memory
//! database.

use bookvault_api::{AppConfig, AppState, AuthError, ServiceError};
use bookvault_core::validation::MAX_QUANTITY;
use bookvault_core::{CoreError, NewBook, Operation, Role};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn state() -> AppState {
    init_tracing();
    AppState::new(AppConfig::in_memory())
        .await
        .expect("in-memory state")
}

fn core(err: ServiceError) -> CoreError {
    match err {
        ServiceError::Core(e) => e,
        other => panic!("expected a core error, got {other:?}"),
    }
}

fn book(title: &str, author: &str, price_cents: i64) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: author.to_string(),
        description: format!("{title}, a novel"),
        price_cents,
    }
}

async fn bearer(state: &AppState, username: &str, password: &str) -> String {
    let token = state.users.login(username, password).await.expect("login");
    format!("Bearer {token}")
}

#[tokio::test]
async fn first_user_is_admin_and_roles_gate_operations() {
    let state = state().await;

    let alice = state.users.register("alice", "pw-a", "alice@example.com").await.unwrap();
    let bob = state.users.register("bob", "pw-b", "bob@example.com").await.unwrap();
    assert_eq!(alice.role, Role::Admin);
    assert_eq!(bob.role, Role::User);

    let admin = bearer(&state, "alice", "pw-a").await;
    let user = bearer(&state, "bob", "pw-b").await;

    let principal = state.gate.authorize(Some(&admin), Operation::CreateBook).unwrap();
    assert_eq!(principal.user_id, alice.id);
    assert_eq!(principal.role, Role::Admin);

    assert!(matches!(
        state.gate.authorize(Some(&user), Operation::UpdateOrderStatus),
        Err(AuthError::Forbidden { .. })
    ));
    assert!(matches!(
        state.gate.authorize(Some(&user), Operation::CreateBook),
        Err(AuthError::Forbidden { .. })
    ));
    assert!(state.gate.authorize(Some(&user), Operation::CreateOrder).is_ok());

    assert!(matches!(
        state.gate.authorize(None, Operation::GetCart),
        Err(AuthError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn bad_credentials_look_the_same() {
    let state = state().await;
    state.users.register("alice", "pw-a", "alice@example.com").await.unwrap();

    let wrong_password = core(state.users.login("alice", "nope").await.unwrap_err());
    let unknown_user = core(state.users.login("mallory", "nope").await.unwrap_err());

    assert!(matches!(wrong_password, CoreError::InvalidCredentials));
    assert!(matches!(unknown_user, CoreError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn checkout_snapshots_prices_and_empties_cart() {
    let state = state().await;
    state.users.register("alice", "pw-a", "alice@example.com").await.unwrap();
    state.users.register("bob", "pw-b", "bob@example.com").await.unwrap();

    let admin = bearer(&state, "alice", "pw-a").await;
    let user = bearer(&state, "bob", "pw-b").await;

    state.gate.authorize(Some(&admin), Operation::CreateBook).unwrap();
    let b1 = state.books.create_book(book("Dune", "Frank Herbert", 1000)).await.unwrap();
    let b2 = state.books.create_book(book("Emma", "Jane Austen", 2000)).await.unwrap();

    let bob = state.gate.authorize(Some(&user), Operation::AddToCart).unwrap();
    state.carts.add_to_cart(bob.user_id, b1.id, 1).await.unwrap();
    state.carts.add_to_cart(bob.user_id, b1.id, 1).await.unwrap();
    state.carts.add_to_cart(bob.user_id, b2.id, 1).await.unwrap();

    let cart = state.carts.cart_for_user(bob.user_id).await.unwrap();
    assert_eq!(cart.subtotal.cents(), 4000);

    state.gate.authorize(Some(&user), Operation::CreateOrder).unwrap();
    let order = state.orders.create_order(bob.user_id, "221B Baker St").await.unwrap();
    assert_eq!(order.status, "pending");
    assert_eq!(order.total.cents(), 4000);
    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.lines[0].quantity, 2);

    let cart = state.carts.get_cart(cart.id).await.unwrap();
    assert!(cart.is_empty());

    state.gate.authorize(Some(&admin), Operation::UpdatePrice).unwrap();
    state.books.update_price(b1.id, 5000).await.unwrap();

    let reread = state.orders.get_order(order.id).await.unwrap();
    assert_eq!(reread.total.cents(), 4000);
    assert_eq!(reread.lines[0].price.cents(), 1000);
    assert_eq!(reread.lines[0].title, "Dune");

    let err = core(state.orders.create_order(bob.user_id, "221B Baker St").await.unwrap_err());
    assert!(matches!(err, CoreError::EmptyCart));

    let mine = state.orders.get_user_orders(bob.user_id).await.unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn oversized_quantities_leave_the_cart_usable() {
    let state = state().await;
    let bob = state.users.register("bob", "pw-b", "bob@example.com").await.unwrap();
    let dune = state.books.create_book(book("Dune", "Frank Herbert", 1000)).await.unwrap();

    let err = core(state.carts.add_to_cart(bob.id, dune.id, i64::MAX / 100).await.unwrap_err());
    assert!(matches!(err, CoreError::Validation(_)));

    state.carts.add_to_cart(bob.id, dune.id, MAX_QUANTITY).await.unwrap();
    let err = core(state.carts.add_to_cart(bob.id, dune.id, 1).await.unwrap_err());
    assert!(matches!(err, CoreError::Validation(_)));

    let cart = state.carts.cart_for_user(bob.id).await.unwrap();
    assert_eq!(cart.lines[0].quantity, MAX_QUANTITY);

    let order = state.orders.create_order(bob.id, "221B Baker St").await.unwrap();
    assert_eq!(order.total.cents(), 1000 * MAX_QUANTITY);
}

#[tokio::test]
async fn shipped_orders_cannot_be_cancelled() {
    let state = state().await;
    state.users.register("alice", "pw-a", "alice@example.com").await.unwrap();
    let bob = state.users.register("bob", "pw-b", "bob@example.com").await.unwrap();

    let dune = state.books.create_book(book("Dune", "Frank Herbert", 1000)).await.unwrap();
    state.carts.add_to_cart(bob.id, dune.id, 1).await.unwrap();
    let order = state.orders.create_order(bob.id, "221B Baker St").await.unwrap();

    state.orders.update_status(order.id, "approved").await.unwrap();
    state.orders.update_status(order.id, "shipped").await.unwrap();

    let err = core(state.orders.cancel_order(order.id).await.unwrap_err());
    assert!(matches!(err, CoreError::OrderCancelForbidden { ref status, .. } if status == "shipped"));

    let err = core(state.orders.cancel_order(order.id + 100).await.unwrap_err());
    assert!(matches!(err, CoreError::OrderNotFound(_)));

    assert_eq!(state.orders.get_orders_by_status("SHIPPED").await.unwrap().len(), 1);
}

#[tokio::test]
async fn reviews_round_trip_through_services() {
    let state = state().await;
    let alice = state.users.register("alice", "pw-a", "alice@example.com").await.unwrap();
    let emma = state.books.create_book(book("Emma", "Jane Austen", 2000)).await.unwrap();

    state.reviews.add_review(alice.id, emma.id, "Delightful").await.unwrap();

    let reviews = state.reviews.get_reviews_by_user(alice.id).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].username, "alice");
    assert_eq!(reviews[0].author, "Jane Austen");
}
