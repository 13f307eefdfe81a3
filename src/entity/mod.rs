pub mod cart_items;
pub mod listings;
pub mod notifications;
pub mod orders;
pub mod payment_attempts;
pub mod products;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use listings::Entity as Listings;
pub use notifications::Entity as Notifications;
pub use orders::Entity as Orders;
pub use payment_attempts::Entity as PaymentAttempts;
pub use products::Entity as Products;
pub use users::Entity as Users;
