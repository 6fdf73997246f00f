//! Declarative macros to reduce boilerplate across the hwpm codebase

/// Define an IP identifier enum with automatic `name()` and `all()` implementations
///
/// # Example
/// ```
/// use hwpm::ip_enum;
///
/// ip_enum! {
///     pub enum DemoIp {
///         Pma => "PMA",
///         Rtr => "RTR",
///     }
/// }
///
/// // Usage
/// let ip = DemoIp::Rtr;
/// assert_eq!(ip.name(), "RTR");
/// assert_eq!(DemoIp::all().len(), 2);
/// ```
///
/// Expands to:
/// - An enum with Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord derives
/// - A `name(&self) -> &'static str` method
/// - An `all() -> Vec<Self>` method
/// - A `Display` implementation printing the name
#[macro_export]
macro_rules! ip_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $str:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($(#[$vmeta])* $variant,)*
        }

        impl $name {
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $str,)*
                }
            }

            pub fn all() -> Vec<$name> {
                vec![$($name::$variant,)*]
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

/// Log function entry at trace level, the way every HAL entry point does
#[macro_export]
macro_rules! hwpm_fn {
    () => {
        tracing::trace!(target: "hwpm::fn", "{}", {
            fn f() {}
            let name = ::std::any::type_name_of_val(&f);
            name.strip_suffix("::f").unwrap_or(name)
        })
    };
}
