// Copyright 2025 Johann Kempter
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
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # memberscope
//!
//! A declarative member-resolution engine for JVM-style type universes.
//!
//! Identifiers do not survive obfuscation or recompilation; structure mostly does.
//! `memberscope` locates classes, properties, functions and constructors by what they look
//! like (names where known, modifiers, parameter and return types, counts, position among
//! similar members) instead of by exact identifier, so lookups keep working when a binary
//! is renamed or rebuilt.
//!
//! ## Features
//!
//! - **Structural type equivalence** - Raw classes, parameterized types, projections with
//!   variance, type variables and a `Vague` wildcard, compared under configurable strictness
//! - **Declarative criteria** - Class, property, function and constructor rules with name,
//!   modifier, type, count and positional constraints
//! - **Positional tie-break** - Pick the Nth match from either end, among all candidates or
//!   among the structural matches
//! - **Superclass fallback** - Optionally continue the search up the inheritance chain
//! - **Descriptor decoding** - Bit-exact JVM descriptor parsing and compiler-metadata
//!   signatures resolved to loaded classes and members
//! - **Concurrent caching** - Class lookups and query results memoized process-wide
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use memberscope::prelude::*;
//!
//! let host = Arc::new(InMemoryHost::new());
//! let class = host.insert_class(ClassInfo::new("com.example.Player"));
//! host.insert_member(MemberInfo::function(
//!     "com.example.Player",
//!     "a",
//!     vec![TypeDescriptor::class("java.lang.String"), TypeDescriptor::class("int")],
//!     TypeDescriptor::class("boolean"),
//! ));
//!
//! let engine = MatchEngine::for_host(host);
//! let found = engine.find_functions(
//!     &class,
//!     &FunctionCriterion::new()
//!         .with_param_types(vec![TypeDescriptor::Vague, TypeDescriptor::class("int")])
//!         .with_return_type(TypeDescriptor::class("boolean")),
//! )?;
//! assert_eq!(found.primary().name, "a");
//! # Ok::<(), memberscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`typesystem`] - Type model and structural equivalence
//! - [`rules`] - Declarative criteria, positional and count rules, diagnostics templates
//! - [`host`] - Capabilities consumed from the host runtime, plus an in-memory host
//! - [`signatures`] - Descriptor parsing and compiler-metadata signature supports
//! - [`engine`] - The match engine, signature search and remedy plans
//! - [`cache`] - Process-wide resolution cache
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`]. Lookups that find nothing raise a single
//! not-found error listing every active rule; criteria that make no sense are rejected with
//! [`Error::InvalidRuleConfiguration`] before any candidate is examined.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use memberscope::prelude::*;
///
/// let criterion = FunctionCriterion::new().with_name("run").empty_params();
/// assert!(criterion.is_active());
/// ```
pub mod prelude;

/// Type model and structural type equivalence
///
/// # Key Types
///
/// - [`typesystem::TypeDescriptor`] - Closed union over every type representation
/// - [`typesystem::Strictness`] - Optional variance, nullability and annotation clauses
///
/// # Main Functions
///
/// - [`typesystem::type_eq`] - Asymmetric structural equivalence
/// - [`typesystem::param_types_eq`] - Positional parameter list comparison
pub mod typesystem;

/// Declarative criteria for classes and members
pub mod rules;

/// Host runtime capabilities and an in-memory implementation
pub mod host;

/// JVM descriptors and compiler-metadata signatures
pub mod signatures;

/// The match engine
pub mod engine;

/// Process-wide memoization of class lookups and query results
pub mod cache;

/// Engine configuration
pub mod config;

/// `memberscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `memberscope` Error type
///
/// # Examples
///
/// ```rust
/// use memberscope::{Error, MemberKind};
///
/// let err = Error::MemberNotFound {
///     kind: MemberKind::Function,
///     class: "com.example.Foo".to_string(),
///     templates: vec!["name:[bar]".to_string()],
/// };
/// assert_eq!(err.to_string(), "Can't find this function in [com.example.Foo]:\n -> name:[bar]");
/// ```
pub use error::Error;

/// Why a classloading context refused to load a type
pub use error::LoadError;

/// The kind of member a query looks for
pub use error::MemberKind;

pub use cache::ResolutionCache;
pub use config::EngineConfig;
pub use engine::{MatchEngine, Resolved};
