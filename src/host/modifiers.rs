//! Modifier flags and the predicate view handed to modifier criteria.
//!
//! # Key Types
//! - [`Modifiers`]: JVM access and property flags, bit-compatible with the class file format
//! - [`LanguageTraits`]: Language-level traits a host may report in addition
//! - [`ModifierRules`]: The view a modifier predicate receives; records every flag it consults

use std::cell::RefCell;

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// JVM access flags of a class or member
    pub struct Modifiers: u16 {
        /// Accessible from everywhere
        const PUBLIC = 0x0001;
        /// Accessible only from the declaring class
        const PRIVATE = 0x0002;
        /// Accessible from subclasses and the package
        const PROTECTED = 0x0004;
        /// Belongs to the class, not an instance
        const STATIC = 0x0008;
        /// Cannot be overridden, subclassed or reassigned
        const FINAL = 0x0010;
        /// Invocation is wrapped by a monitor
        const SYNCHRONIZED = 0x0020;
        /// Field is volatile
        const VOLATILE = 0x0040;
        /// Field is not serialized
        const TRANSIENT = 0x0080;
        /// Implemented outside the JVM
        const NATIVE = 0x0100;
        /// Class is an interface
        const INTERFACE = 0x0200;
        /// No implementation provided
        const ABSTRACT = 0x0400;
        /// Strict floating point
        const STRICT = 0x0800;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Language-level traits that do not exist as JVM access flags
    pub struct LanguageTraits: u32 {
        /// Declared in Kotlin source
        const KOTLIN = 0x0000_0001;
        /// Companion object
        const COMPANION = 0x0000_0002;
        /// Data class
        const DATA = 0x0000_0004;
        /// Inner class
        const INNER = 0x0000_0008;
        /// Sealed class
        const SEALED = 0x0000_0010;
        /// Functional interface
        const FUN = 0x0000_0020;
        /// Value (inline) class
        const VALUE = 0x0000_0040;
        /// Anonymous class or object expression
        const ANONYMOUS = 0x0000_0080;
        /// Compile-time constant
        const CONST = 0x0000_0100;
        /// Late-initialized property
        const LATEINIT = 0x0000_0200;
        /// Mutable property
        const VAR = 0x0000_0400;
        /// Suspending function
        const SUSPEND = 0x0000_0800;
        /// External function
        const EXTERNAL = 0x0000_1000;
        /// Extension function or property
        const EXTENSION = 0x0000_2000;
        /// Declared at file level
        const TOP = 0x0000_4000;
        /// Infix function
        const INFIX = 0x0000_8000;
        /// Operator function
        const OPERATOR = 0x0001_0000;
        /// Inline function
        const INLINE = 0x0002_0000;
        /// Open for overriding
        const OPEN = 0x0004_0000;
    }
}

/// Generates predicate accessors that record their name and result.
macro_rules! modifier_predicates {
    ($($(#[$doc:meta])* $fn_name:ident => $label:literal, |$view:ident| $test:expr;)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $fn_name(&self) -> bool {
                let $view = self;
                let result = $test;
                self.record($label, result);
                result
            }
        )*
    };
}

/// Read-only view of a candidate's modifiers, passed to modifier predicates.
///
/// Every accessor records `<isName> (result)`; the engine collects these records after
/// evaluation to render the `modifiers:[...]` line of a not-found message.
pub struct ModifierRules {
    modifiers: Modifiers,
    traits: LanguageTraits,
    is_property: bool,
    records: RefCell<Vec<String>>,
}

impl ModifierRules {
    /// Wraps the flags of a single candidate.
    #[must_use]
    pub fn new(modifiers: Modifiers, traits: LanguageTraits, is_property: bool) -> Self {
        ModifierRules {
            modifiers,
            traits,
            is_property,
            records: RefCell::new(Vec::new()),
        }
    }

    /// Raw JVM flags.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Raw language traits.
    #[must_use]
    pub fn traits(&self) -> LanguageTraits {
        self.traits
    }

    /// The predicates consulted so far, in call order.
    #[must_use]
    pub fn into_records(self) -> Vec<String> {
        self.records.into_inner()
    }

    fn record(&self, label: &str, result: bool) {
        self.records.borrow_mut().push(format!("<{label}> ({result})"));
    }

    modifier_predicates! {
        /// `public`
        is_public => "isPublic", |m| m.modifiers.contains(Modifiers::PUBLIC);
        /// `private`
        is_private => "isPrivate", |m| m.modifiers.contains(Modifiers::PRIVATE);
        /// `protected`
        is_protected => "isProtected", |m| m.modifiers.contains(Modifiers::PROTECTED);
        /// `static`
        is_static => "isStatic", |m| m.modifiers.contains(Modifiers::STATIC);
        /// `final`
        is_final => "isFinal", |m| m.modifiers.contains(Modifiers::FINAL);
        /// `synchronized`
        is_synchronized => "isSynchronized", |m| m.modifiers.contains(Modifiers::SYNCHRONIZED);
        /// `volatile`
        is_volatile => "isVolatile", |m| m.modifiers.contains(Modifiers::VOLATILE);
        /// `transient`
        is_transient => "isTransient", |m| m.modifiers.contains(Modifiers::TRANSIENT);
        /// `native`
        is_native => "isNative", |m| m.modifiers.contains(Modifiers::NATIVE);
        /// `interface`
        is_interface => "isInterface", |m| m.modifiers.contains(Modifiers::INTERFACE);
        /// `abstract`
        is_abstract => "isAbstract", |m| m.modifiers.contains(Modifiers::ABSTRACT);
        /// `strictfp`
        is_strict => "isStrict", |m| m.modifiers.contains(Modifiers::STRICT);
        /// Declared in Kotlin source
        is_kotlin => "isKotlin", |m| m.traits.contains(LanguageTraits::KOTLIN);
        /// Companion object
        is_companion => "isCompanion", |m| m.traits.contains(LanguageTraits::COMPANION);
        /// Data class
        is_data => "isData", |m| m.traits.contains(LanguageTraits::DATA);
        /// Inner class
        is_inner => "isInner", |m| m.traits.contains(LanguageTraits::INNER);
        /// Sealed class
        is_sealed => "isSealed", |m| m.traits.contains(LanguageTraits::SEALED);
        /// Functional interface
        is_fun => "isFun", |m| m.traits.contains(LanguageTraits::FUN);
        /// Value class
        is_value => "isValue", |m| m.traits.contains(LanguageTraits::VALUE);
        /// Anonymous class
        is_anonymous => "isAnonymous", |m| m.traits.contains(LanguageTraits::ANONYMOUS);
        /// Compile-time constant
        is_const => "isConst", |m| m.traits.contains(LanguageTraits::CONST);
        /// `lateinit` property
        is_lateinit => "isLateinit", |m| m.traits.contains(LanguageTraits::LATEINIT);
        /// Mutable property
        is_var => "isVar", |m| m.is_property && m.traits.contains(LanguageTraits::VAR);
        /// Read-only property
        is_val => "isVal", |m| m.is_property && !m.traits.contains(LanguageTraits::VAR);
        /// Suspending function
        is_suspend => "isSuspend", |m| m.traits.contains(LanguageTraits::SUSPEND);
        /// External function
        is_external => "isExternal", |m| m.traits.contains(LanguageTraits::EXTERNAL);
        /// Extension function or property
        is_extension => "isExtension", |m| m.traits.contains(LanguageTraits::EXTENSION);
        /// Declared at file level
        is_top => "isTop", |m| m.traits.contains(LanguageTraits::TOP);
        /// Infix function
        is_infix => "isInfix", |m| m.traits.contains(LanguageTraits::INFIX);
        /// Operator function
        is_operator => "isOperator", |m| m.traits.contains(LanguageTraits::OPERATOR);
        /// Inline function
        is_inline => "isInline", |m| m.traits.contains(LanguageTraits::INLINE);
        /// Open for overriding
        is_open => "isOpen", |m| m.traits.contains(LanguageTraits::OPEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_record_in_call_order() {
        let rules = ModifierRules::new(
            Modifiers::PUBLIC | Modifiers::STATIC,
            LanguageTraits::empty(),
            false,
        );

        assert!(rules.is_public());
        assert!(!rules.is_final());
        assert_eq!(
            rules.into_records(),
            vec!["<isPublic> (true)".to_string(), "<isFinal> (false)".to_string()]
        );
    }

    #[test]
    fn val_and_var_only_apply_to_properties() {
        let property = ModifierRules::new(Modifiers::PRIVATE, LanguageTraits::empty(), true);
        assert!(property.is_val());
        assert!(!property.is_var());

        let function = ModifierRules::new(Modifiers::PRIVATE, LanguageTraits::VAR, false);
        assert!(!function.is_val());
        assert!(!function.is_var());
    }

    #[test]
    fn bits_match_class_file_values() {
        assert_eq!(Modifiers::from_bits_truncate(0x0019), Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL);
        assert_eq!(Modifiers::ABSTRACT.bits(), 0x0400);
    }
}
