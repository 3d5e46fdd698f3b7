//! Canonical name grammar: composing names from reference data and checking
//! the shape of names supplied by callers.
//!
//! ```text
//! T:N.Outer`1.Inner`2
//! F:N.TestEnum.Member1
//! M:N.Outer`1.Inner`2.TestMethod``1(System.Int32,System.Byte[],N.Outer{`0}.Inner{...})
//! P:N.TestClass`1.Item(System.Int32,System.String)
//! M:N.TestClass`1.System#IDisposable#Dispose
//! M:N.Money.op_Implicit(N.Money)~System.Decimal
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MetadocError, MetadocResult};
use crate::reference::{MemberReference, NamedTypeReference, TypeReference};

/// `<letter>:<identifier>`
static SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<prefix>[A-Za-z]):(?P<identifier>\S.*)$").unwrap());

const MIN_LENGTH: usize = 3;

// ============================================================================
// Prefix
// ============================================================================

/// The member-type letter in front of a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamePrefix {
    Type,
    /// Fields and enum constants.
    Field,
    Event,
    Property,
    /// Methods and constructors.
    Method,
}

impl NamePrefix {
    pub const ALL: [NamePrefix; 5] = [
        NamePrefix::Type,
        NamePrefix::Field,
        NamePrefix::Event,
        NamePrefix::Property,
        NamePrefix::Method,
    ];

    pub fn letter(self) -> char {
        match self {
            NamePrefix::Type => 'T',
            NamePrefix::Field => 'F',
            NamePrefix::Event => 'E',
            NamePrefix::Property => 'P',
            NamePrefix::Method => 'M',
        }
    }

    /// Parse a prefix letter, ignoring case.
    pub fn from_letter(letter: char) -> Option<Self> {
        let upper = letter.to_ascii_uppercase();
        NamePrefix::ALL.into_iter().find(|p| p.letter() == upper)
    }

    fn allowed_letters() -> String {
        NamePrefix::ALL
            .iter()
            .map(|p| p.letter().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for NamePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Check that `name` has the `<letter>:<identifier>` shape with a known
/// prefix, and return the prefix.
pub fn validate(name: &str) -> MetadocResult<NamePrefix> {
    if name.trim().is_empty() {
        return Err(MetadocError::invalid_argument(
            "name",
            "canonical name cannot be empty or whitespace",
        ));
    }
    if name.chars().count() < MIN_LENGTH {
        return Err(MetadocError::malformed_name(
            name,
            format!("must be at least {MIN_LENGTH} characters long"),
        ));
    }
    let captures = SHAPE.captures(name).ok_or_else(|| {
        MetadocError::malformed_name(
            name,
            "expected a member type letter followed by ':' and an identifier",
        )
    })?;
    let letter = captures["prefix"].chars().next().unwrap_or_default();
    NamePrefix::from_letter(letter).ok_or_else(|| {
        MetadocError::malformed_name(
            name,
            format!(
                "unknown member type '{letter}', expected one of {}",
                NamePrefix::allowed_letters()
            ),
        )
    })
}

// ============================================================================
// Composition
// ============================================================================

/// `N.Outer`1.Inner`2`: the dotted name of a type definition, with each
/// nesting level's own arity.
pub fn type_identifier(reference: &NamedTypeReference) -> String {
    let mut out = String::new();
    write_type_identifier(&mut out, reference, true, true);
    out
}

/// `N.Outer.Inner`2`: the dotted name with the arity of the innermost level
/// only. Older documentation corpora spell nested generic types this way.
pub fn innermost_arity_identifier(reference: &NamedTypeReference) -> String {
    let mut out = String::new();
    write_type_identifier(&mut out, reference, true, false);
    out
}

fn write_type_identifier(
    out: &mut String,
    reference: &NamedTypeReference,
    own_arity: bool,
    outer_arity: bool,
) {
    match &reference.declaring_type {
        Some(declaring) => {
            write_type_identifier(out, declaring, outer_arity, outer_arity);
            out.push('.');
        }
        None if !reference.namespace.is_empty() => {
            out.push_str(&reference.namespace);
            out.push('.');
        }
        None => {}
    }
    out.push_str(&reference.name);
    if own_arity && !reference.generic_arguments.is_empty() {
        out.push('`');
        out.push_str(&reference.generic_arguments.len().to_string());
    }
}

/// Whether every generic argument across the declaring chain is the type's
/// own parameter at its own position, i.e. the reference is the definition.
pub fn is_open_definition(reference: &NamedTypeReference) -> bool {
    fn collect<'a>(reference: &'a NamedTypeReference, out: &mut Vec<&'a TypeReference>) {
        if let Some(declaring) = &reference.declaring_type {
            collect(declaring, out);
        }
        out.extend(reference.generic_arguments.iter());
    }
    let mut args = Vec::new();
    collect(reference, &mut args);
    args.iter().enumerate().all(|(index, arg)| {
        matches!(arg, TypeReference::GenericTypeParameter(p) if p.position == index)
    })
}

/// Canonical name of a type mention. Definitions use the dotted arity form;
/// constructed types (arrays, closed generics) use their type-signature form.
pub fn type_name(reference: &TypeReference) -> String {
    match reference {
        TypeReference::Named(named) if is_open_definition(named) => {
            format!("{}:{}", NamePrefix::Type, type_identifier(named))
        }
        other => format!("{}:{other}", NamePrefix::Type),
    }
}

/// The explicit-implementation qualifier for members implementing
/// `interface`: its type signature with `.` replaced by `#` and `,` by `@`.
pub fn explicit_qualifier(interface: &TypeReference) -> String {
    interface
        .to_string()
        .chars()
        .map(|c| match c {
            '.' => '#',
            ',' => '@',
            other => other,
        })
        .collect()
}

/// Canonical name of a member.
pub fn member_name(reference: &MemberReference) -> String {
    let (prefix, simple, explicit, method_arity, parameters, conversion) = match reference {
        MemberReference::Constant(field) | MemberReference::Field(field) => {
            (NamePrefix::Field, field.name.as_str(), None, 0, None, None)
        }
        MemberReference::Constructor(ctor) => {
            let name = if ctor.is_static { "#cctor" } else { "#ctor" };
            (
                NamePrefix::Method,
                name,
                None,
                0,
                Some(&ctor.parameter_types),
                None,
            )
        }
        MemberReference::Event(event) => (
            NamePrefix::Event,
            event.name.as_str(),
            event.explicit_interface.as_deref(),
            0,
            None,
            None,
        ),
        MemberReference::Property(property) => (
            NamePrefix::Property,
            property.name.as_str(),
            property.explicit_interface.as_deref(),
            0,
            Some(&property.parameter_types),
            None,
        ),
        MemberReference::Method(method) => (
            NamePrefix::Method,
            method.name.as_str(),
            method.explicit_interface.as_deref(),
            method.generic_arguments.len(),
            Some(&method.parameter_types),
            method
                .is_conversion_operator
                .then_some(method.return_type.as_ref()),
        ),
    };

    let mut out = format!("{prefix}:{}.", type_identifier(reference.declaring_type()));
    if let Some(interface) = explicit {
        out.push_str(&explicit_qualifier(interface));
        out.push('#');
    }
    out.push_str(simple);
    if method_arity > 0 {
        out.push_str("``");
        out.push_str(&method_arity.to_string());
    }
    if let Some(parameters) = parameters.filter(|p| !p.is_empty()) {
        let list = parameters
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",");
        out.push('(');
        out.push_str(&list);
        out.push(')');
    }
    if let Some(return_type) = conversion {
        out.push('~');
        out.push_str(&return_type.to_string());
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
