/// A permission a route requires, named at the route's declaration.
pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

/// Declare a zero-sized permission marker.
#[macro_export]
macro_rules! permission {
    ($(#[$meta:meta])* $name:ident => $value:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $crate::services::auth::Permission for $name {
            const NAME: &'static str = $value;
        }
    };
}
