// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A minimal `bitflags`-style macro used for the bind-flag style masks of the RHI.

/// Declares a transparent bitmask type with named flag constants.
///
/// The generated type supports the usual set operations (`|`, `&`, `contains`,
/// `intersects`, ...) and a `Debug` implementation that prints the set flag names.
#[macro_export]
macro_rules! ember_bitflags {
    (
        $(#[$outer:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$inner:meta])*
                const $flag:ident = $value:expr;
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name {
            bits: $ty,
        }

        #[allow(dead_code)]
        impl $name {
            $(
                $(#[$inner])*
                pub const $flag: Self = Self { bits: $value };
            )*

            const NAMED: &'static [(&'static str, $ty)] = &[
                $((stringify!($flag), $value),)*
            ];

            /// Returns a mask with no flags set.
            pub const fn empty() -> Self {
                Self { bits: 0 }
            }

            /// Returns a mask with every named flag set.
            pub const fn all() -> Self {
                Self { bits: 0 $(| $value)* }
            }

            /// Returns the raw bits of the mask.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// Builds a mask from raw bits, dropping any bit that is not a named flag.
            pub const fn from_bits_truncate(bits: $ty) -> Self {
                Self { bits: bits & Self::all().bits }
            }

            /// Returns `true` if no flag is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// Returns `true` if every flag of `other` is also set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// Returns `true` if `self` and `other` share at least one flag.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Returns the union of two masks.
            pub const fn union(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }

            /// Sets the flags of `other` in place.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Clears the flags of `other` in place.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }
        }

        impl ::std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl ::std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.insert(rhs);
            }
        }

        impl ::std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                Self { bits: self.bits & rhs.bits }
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let mut first = true;
                write!(f, "{}(", stringify!($name))?;
                for (flag_name, value) in Self::NAMED {
                    if *value != 0 && (self.bits & *value) == *value {
                        if !first {
                            write!(f, " | ")?;
                        }
                        write!(f, "{flag_name}")?;
                        first = false;
                    }
                }
                if first {
                    write!(f, "empty")?;
                }
                write!(f, ")")
            }
        }
    };
}
