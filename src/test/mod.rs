//! Fixture universe shared by the unit tests.
//!
//! ```text
//! com.example.Base                      (no superclass)
//!   functions   f(), parse(String): int, f(int), toString(): String, hashCode(): int, f(long)
//!   raw only    getSize(): int
//!   properties  size: int (getter getSize), name: String
//!   ctors       (), (int)
//!   top level   topLevel()
//! com.example.Base$1 extends Object     (anonymous, enclosed by Base, no members)
//! com.example.Derived extends Base      run(), implements java.io.Serializable
//! java.lang.String, java.lang.Object
//! ```

use std::sync::Arc;

use crate::{
    cache::ResolutionCache,
    config::EngineConfig,
    engine::MatchEngine,
    host::{ClassInfo, InMemoryHost, MemberInfo},
    signatures::{PropertySignatureData, SignatureData},
    typesystem::{TypeDescriptor, OBJECT_CLASS},
};

const BASE: &str = "com.example.Base";
const DERIVED: &str = "com.example.Derived";

fn ty(name: &str) -> TypeDescriptor {
    TypeDescriptor::class(name)
}

// Helper function to create a function member
fn function(class: &str, name: &str, params: &[&str], ret: &str) -> MemberInfo {
    MemberInfo::function(class, name, params.iter().map(|p| ty(p)).collect(), ty(ret))
}

/// Builds the fixture universe described in the module docs.
pub fn universe() -> Arc<InMemoryHost> {
    let host = InMemoryHost::new();

    host.insert_class(ClassInfo::new(OBJECT_CLASS));
    host.insert_class(ClassInfo::new("java.lang.String").extends(OBJECT_CLASS));
    host.insert_class(ClassInfo::new(BASE));
    host.insert_class(
        ClassInfo::new("com.example.Base$1")
            .extends(OBJECT_CLASS)
            .enclosed_by(BASE),
    );
    host.insert_class(
        ClassInfo::new(DERIVED)
            .extends(BASE)
            .implements("java.io.Serializable"),
    );

    host.insert_member(function(BASE, "f", &[], "void"));
    host.insert_member(function(BASE, "parse", &["java.lang.String"], "int"));
    host.insert_member(function(BASE, "f", &["int"], "void"));
    host.insert_member(function(BASE, "toString", &[], "java.lang.String"));
    host.insert_member(function(BASE, "hashCode", &[], "int"));
    host.insert_member(function(BASE, "f", &["long"], "void"));
    host.insert_raw_member(function(BASE, "getSize", &[], "int"));

    host.insert_member(
        MemberInfo::property(BASE, "size", ty("int"))
            .with_accessors(Some(function(BASE, "getSize", &[], "int")), None),
    );
    host.insert_member(MemberInfo::property(BASE, "name", ty("java.lang.String")));
    host.insert_member(MemberInfo::constructor(BASE, vec![]));
    host.insert_member(MemberInfo::constructor(BASE, vec![ty("int")]));
    host.insert_top_level_member(BASE, function(BASE, "topLevel", &[], "void"));

    host.insert_member(function(DERIVED, "run", &[], "void"));

    for (name, descriptor) in [
        ("f", "()V"),
        ("parse", "(Ljava/lang/String;)I"),
        ("f", "(I)V"),
        ("broken", "(I"),
        ("f", "(J)V"),
    ] {
        host.insert_function_signature(BASE, SignatureData::new(name, descriptor));
    }
    host.insert_property_signature(
        BASE,
        PropertySignatureData::new("size")
            .with_field("size", "I")
            .with_getter("getSize", "()I"),
    );
    host.insert_property_signature(
        BASE,
        PropertySignatureData::new("name").with_getter("getName", "()Ljava/lang/String;"),
    );

    Arc::new(host)
}

/// An engine over `host` with a private cache.
pub fn engine_with(host: Arc<InMemoryHost>, config: EngineConfig) -> MatchEngine {
    MatchEngine::for_host(host)
        .with_config(config)
        .with_cache(Arc::new(ResolutionCache::new()))
}

/// An engine over a fresh [`universe`] with the default configuration.
pub fn engine() -> MatchEngine {
    engine_with(universe(), EngineConfig::default())
}
