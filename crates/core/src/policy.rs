//! Access policy: a pure function from (role, resource, operation) to
//! allow/deny.
//!
//! The policy is deliberately a flat predicate rather than a permission-class
//! hierarchy. Route handlers resolve the caller's [`Role`] once (from the
//! bearer token, or `Anonymous` when absent) and consult [`is_allowed`]
//! before touching the store. Ownership scoping (a customer sees only their
//! own orders) is a query-layer concern, not a policy concern.

use serde::{Deserialize, Serialize};

/// Caller role, resolved from the request's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// No credentials presented.
    Anonymous,
    /// Valid credentials for a regular user.
    Authenticated,
    /// Valid credentials for a staff user.
    Staff,
}

impl Role {
    /// Whether this role carries any credentials at all.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    /// Whether this role is staff.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Staff)
    }
}

/// Kind of resource an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Product,
    Collection,
    Review,
    ProductImage,
    Cart,
    CartItem,
    Customer,
    /// The `/customers/me` shortcut: the caller's own customer record.
    CustomerSelf,
    /// The history sub-resource on a customer.
    CustomerHistory,
    Order,
}

/// Operation requested against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Whether this operation only reads.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::List | Self::Retrieve)
    }
}

/// Decide whether `role` may perform `operation` on `resource`.
///
/// Rules:
/// - Catalog (products, collections): reads open to all, mutations staff-only.
/// - Reviews and product images: open, nested under a product.
/// - Carts and cart items: open; possession of the opaque cart token is the
///   capability.
/// - Customers: arbitrary records are staff-only; the self shortcut needs
///   authentication; the history sub-resource is staff-only.
/// - Orders: create/list/retrieve need authentication (listing is
///   ownership-scoped by the query layer); update and delete are staff-only.
#[must_use]
pub const fn is_allowed(role: Role, resource: Resource, operation: Operation) -> bool {
    match resource {
        Resource::Product | Resource::Collection => {
            operation.is_read() || role.is_staff()
        }
        Resource::Review | Resource::ProductImage | Resource::Cart | Resource::CartItem => true,
        Resource::Customer | Resource::CustomerHistory => role.is_staff(),
        Resource::CustomerSelf => {
            matches!(operation, Operation::Retrieve | Operation::Update)
                && role.is_authenticated()
        }
        Resource::Order => match operation {
            Operation::List | Operation::Retrieve | Operation::Create => role.is_authenticated(),
            Operation::Update | Operation::Delete => role.is_staff(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 3] = [Role::Anonymous, Role::Authenticated, Role::Staff];
    const ALL_OPS: [Operation; 5] = [
        Operation::List,
        Operation::Retrieve,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    #[test]
    fn catalog_reads_are_open_to_all() {
        for role in ALL_ROLES {
            for resource in [Resource::Product, Resource::Collection] {
                assert!(is_allowed(role, resource, Operation::List));
                assert!(is_allowed(role, resource, Operation::Retrieve));
            }
        }
    }

    #[test]
    fn catalog_mutations_require_staff() {
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            for resource in [Resource::Product, Resource::Collection] {
                assert!(!is_allowed(Role::Anonymous, resource, op));
                assert!(!is_allowed(Role::Authenticated, resource, op));
                assert!(is_allowed(Role::Staff, resource, op));
            }
        }
    }

    #[test]
    fn carts_need_no_role() {
        for op in ALL_OPS {
            assert!(is_allowed(Role::Anonymous, Resource::Cart, op));
            assert!(is_allowed(Role::Anonymous, Resource::CartItem, op));
        }
    }

    #[test]
    fn reviews_and_images_are_open() {
        for op in ALL_OPS {
            assert!(is_allowed(Role::Anonymous, Resource::Review, op));
            assert!(is_allowed(Role::Anonymous, Resource::ProductImage, op));
        }
    }

    #[test]
    fn customer_listing_requires_staff() {
        assert!(!is_allowed(Role::Anonymous, Resource::Customer, Operation::List));
        assert!(!is_allowed(Role::Authenticated, Resource::Customer, Operation::List));
        assert!(is_allowed(Role::Staff, Resource::Customer, Operation::List));
    }

    #[test]
    fn customer_self_requires_authentication() {
        for op in [Operation::Retrieve, Operation::Update] {
            assert!(!is_allowed(Role::Anonymous, Resource::CustomerSelf, op));
            assert!(is_allowed(Role::Authenticated, Resource::CustomerSelf, op));
            assert!(is_allowed(Role::Staff, Resource::CustomerSelf, op));
        }
        // The self shortcut is read/update only.
        assert!(!is_allowed(Role::Staff, Resource::CustomerSelf, Operation::Delete));
    }

    #[test]
    fn customer_history_is_staff_only() {
        assert!(!is_allowed(
            Role::Authenticated,
            Resource::CustomerHistory,
            Operation::Retrieve
        ));
        assert!(is_allowed(Role::Staff, Resource::CustomerHistory, Operation::Retrieve));
    }

    #[test]
    fn order_creation_requires_authentication() {
        assert!(!is_allowed(Role::Anonymous, Resource::Order, Operation::Create));
        assert!(is_allowed(Role::Authenticated, Resource::Order, Operation::Create));
    }

    #[test]
    fn order_administration_requires_staff() {
        for op in [Operation::Update, Operation::Delete] {
            assert!(!is_allowed(Role::Authenticated, Resource::Order, op));
            assert!(is_allowed(Role::Staff, Resource::Order, op));
        }
    }
}
