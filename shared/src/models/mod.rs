//! Data models for every resource of the platform.
//!
//! Each module holds the stored entity plus its create/update payloads.
//! Wire format is camelCase JSON; database mapping (snake_case columns)
//! comes from the field names via `sqlx::FromRow` under the `db` feature.

pub mod address;
pub mod category;
pub mod dining_table;
pub mod menu;
pub mod order;
pub mod product;
pub mod reservation;
pub mod restaurant;
pub mod review;
pub mod schedule;

pub use address::{Address, AddressCreate, AddressUpdate};
pub use category::{Category, CategoryCreate, CategoryUpdate, CategoryWithCount};
pub use dining_table::{
    AvailabilityReport, DiningTable, DiningTableCreate, DiningTableUpdate, TableAvailability,
};
pub use menu::{Menu, MenuCreate, MenuUpdate};
pub use order::{
    Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, OrderUpdate, OrderWithItems,
};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use reservation::{Reservation, ReservationCreate, ReservationStatus, ReservationUpdate};
pub use restaurant::{
    AddressBrief, CategoryRef, PriceRange, Restaurant, RestaurantCreate, RestaurantDetail,
    RestaurantSummary, RestaurantUpdate,
};
pub use review::{Review, ReviewCreate, ReviewUpdate};
pub use schedule::{Schedule, ScheduleCreate, ScheduleUpdate};
