//! One repository per entity, re-exported flat.

pub mod admin_user_repo;
pub mod blog_repo;
pub mod category_repo;
pub mod order_repo;
pub mod product_repo;
pub mod service_repo;
pub mod variant_repo;

pub use admin_user_repo::AdminUserRepo;
pub use blog_repo::BlogRepo;
pub use category_repo::CategoryRepo;
pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
pub use service_repo::ServiceRepo;
pub use variant_repo::VariantRepo;
