//! Post-commit signal registry.
//!
//! Listeners are registered once at process start and invoked after the
//! transaction that produced the event has committed. Listeners must not
//! fail the request: they handle (and log) their own errors.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::models::{OrderWithItems, User};

/// Boxed future returned by listeners.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Listener for user-creation events.
pub trait UserCreatedHook: Send + Sync {
    /// Called once per created user, after the creating transaction commits.
    fn user_created<'a>(&'a self, user: &'a User) -> HookFuture<'a>;
}

/// Listener for order-creation events.
pub trait OrderCreatedHook: Send + Sync {
    /// Called once per placed order, after the placement commits.
    fn order_created<'a>(&'a self, order: &'a OrderWithItems) -> HookFuture<'a>;
}

/// Registry of post-commit listeners.
///
/// Built in `main` before the server starts and then immutable; emission
/// iterates the registered listeners in registration order.
#[derive(Default)]
pub struct Signals {
    user_created: Vec<Arc<dyn UserCreatedHook>>,
    order_created: Vec<Arc<dyn OrderCreatedHook>>,
}

impl Signals {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user-created listener.
    pub fn on_user_created(&mut self, hook: Arc<dyn UserCreatedHook>) {
        self.user_created.push(hook);
    }

    /// Register an order-created listener.
    pub fn on_order_created(&mut self, hook: Arc<dyn OrderCreatedHook>) {
        self.order_created.push(hook);
    }

    /// Notify listeners that a user was created.
    pub async fn emit_user_created(&self, user: &User) {
        for hook in &self.user_created {
            hook.user_created(user).await;
        }
    }

    /// Notify listeners that an order was placed.
    pub async fn emit_order_created(&self, order: &OrderWithItems) {
        for hook in &self.order_created {
            hook.order_created(order).await;
        }
    }
}

/// Default order-created listener: records the placement in the log.
pub struct LogOrderCreated;

impl OrderCreatedHook for LogOrderCreated {
    fn order_created<'a>(&'a self, order: &'a OrderWithItems) -> HookFuture<'a> {
        Box::pin(async move {
            tracing::info!(
                order_id = %order.id,
                customer_id = %order.customer_id,
                items = order.items.len(),
                "order placed"
            );
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    use cartwheel_core::{CustomerId, OrderId, PaymentStatus, UserId};

    struct Counter(AtomicUsize);

    impl UserCreatedHook for Counter {
        fn user_created<'a>(&'a self, _user: &'a User) -> HookFuture<'a> {
            Box::pin(async move {
                self.0.fetch_add(1, Ordering::SeqCst);
            })
        }
    }

    impl OrderCreatedHook for Counter {
        fn order_created<'a>(&'a self, _order: &'a OrderWithItems) -> HookFuture<'a> {
            Box::pin(async move {
                self.0.fetch_add(1, Ordering::SeqCst);
            })
        }
    }

    fn test_user() -> User {
        User {
            id: UserId::new(1),
            email: "a@example.com".to_owned(),
            is_staff: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_order() -> OrderWithItems {
        OrderWithItems {
            id: OrderId::new(1),
            customer_id: CustomerId::new(1),
            placed_at: Utc::now(),
            payment_status: PaymentStatus::Pending,
            items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn every_registered_listener_runs_once() {
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let mut signals = Signals::new();
        signals.on_user_created(counter.clone());
        signals.on_order_created(counter.clone());

        signals.emit_user_created(&test_user()).await;
        signals.emit_order_created(&test_order()).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn emitting_with_no_listeners_is_a_no_op() {
        let signals = Signals::new();
        signals.emit_user_created(&test_user()).await;
        signals.emit_order_created(&test_order()).await;
    }
}
