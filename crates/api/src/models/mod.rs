//! Domain models and request/response payloads.
//!
//! Domain structs mirror the relational schema; input structs carry their own
//! validation so handlers can reject out-of-range values before touching the
//! store.

pub mod cart;
pub mod collection;
pub mod customer;
pub mod image;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use cart::{AddCartItem, Cart, CartItem, CartWithItems, UpdateCartItem};
pub use collection::{Collection, CollectionInput, CollectionWithCount};
pub use customer::{Customer, CustomerInput};
pub use image::{ProductImage, ProductImageInput};
pub use order::{CreateOrder, Order, OrderItem, OrderWithItems, UpdateOrder};
pub use product::{Product, ProductInput, ProductResponse, ProductSummary};
pub use review::{Review, ReviewInput};
pub use user::User;
