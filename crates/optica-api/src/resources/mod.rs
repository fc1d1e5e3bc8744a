//! # API Resources
//!
//! One accessor per REST resource. Each borrows the client's transport.
//!
//! | Accessor          | Base path          |
//! |-------------------|--------------------|
//! | `auth()`          | `/auth`            |
//! | `clients()`       | `/clients`         |
//! | `prescriptions()` | `/prescriptions`   |
//! | `products()`      | `/products`        |
//! | `services()`      | `/opticalservices` |
//! | `sales()`         | `/sales`           |
//! | `payments()`      | `/payments`        |

use chrono::NaiveDate;

mod auth;
mod clients;
mod payments;
mod prescriptions;
mod products;
mod sales;
mod services;

pub use auth::{AuthApi, LoginResponse};
pub use clients::ClientsApi;
pub use payments::PaymentsApi;
pub use prescriptions::PrescriptionsApi;
pub use products::ProductsApi;
pub use sales::SalesApi;
pub use services::ServicesApi;

/// Local calendar date used by the date validators.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
