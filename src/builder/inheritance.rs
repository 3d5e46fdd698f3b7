//! Inherited members: shadowing and interface implementation resolution.
//!
//! Both questions compare members by [`MemberSignature`]: simple name, method
//! generic arity and rendered parameter types. Parameter types of an
//! inherited member are rendered after substituting the generic arguments
//! the derived type supplies to its ancestor, so `Base<int>.M(T)` and a
//! derived `M(int)` compare equal.

use std::collections::HashSet;

use tracing::debug;

use super::{DeclarationGraphBuilder, DeclaredMembers};
use crate::declarations::{ImplementationKind, InterfaceImplementation};
use crate::error::{MetadocError, MetadocResult};
use crate::metadata::{Accessibility, Handle, ParamDef, TypeDef, TypeDefId, TypeSig};

/// Identity of a member for hiding and implementation matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MemberSignature {
    name: String,
    generic_arity: usize,
    parameters: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    Field,
    Method,
    Property,
    Event,
}

/// A member derived types inherit: anything but constructors and accessors.
#[derive(Debug)]
struct InheritableMember<'m> {
    handle: Handle,
    kind: SlotKind,
    name: &'m str,
    access: Accessibility,
    explicit_interface: Option<&'m TypeSig>,
    generic_arity: usize,
    parameters: Vec<ParamDef>,
}

impl InheritableMember<'_> {
    fn is_visible_to_derived(&self) -> bool {
        self.access != Accessibility::Private && self.explicit_interface.is_none()
    }
}

impl<'m> DeclarationGraphBuilder<'m> {
    pub(super) fn signature(
        &self,
        name: &str,
        generic_arity: usize,
        parameters: &[ParamDef],
        type_args: &[TypeSig],
    ) -> MetadocResult<MemberSignature> {
        let metadata = self.metadata();
        let parameters = parameters
            .iter()
            .map(|param| {
                let sig = metadata.substitute(&param.param_type, type_args);
                Ok(self.factory().type_reference(&sig)?.to_string())
            })
            .collect::<MetadocResult<Vec<_>>>()?;
        Ok(MemberSignature {
            name: name.to_string(),
            generic_arity,
            parameters,
        })
    }

    fn signature_of(
        &self,
        member: &InheritableMember<'_>,
        type_args: &[TypeSig],
    ) -> MetadocResult<MemberSignature> {
        self.signature(member.name, member.generic_arity, &member.parameters, type_args)
    }

    /// Signatures of every non-private member a type inherits: from its base
    /// class chain, or for interfaces from every inherited interface.
    pub(super) fn inherited_signatures(
        &self,
        def: &TypeDef,
    ) -> MetadocResult<HashSet<MemberSignature>> {
        let mut signatures = HashSet::new();
        for (ancestor, type_args) in self.ancestors(def)? {
            for member in self.inheritable_members(ancestor)? {
                if member.is_visible_to_derived() {
                    signatures.insert(self.signature_of(&member, &type_args)?);
                }
            }
        }
        Ok(signatures)
    }

    /// Ancestors of a type with the generic arguments the type supplies to
    /// each. Interfaces list every interface they inherit, directly or not;
    /// other types their base class chain, nearest first.
    fn ancestors(&self, def: &TypeDef) -> MetadocResult<Vec<(TypeDefId, Vec<TypeSig>)>> {
        let metadata = self.metadata();
        if def.is_interface {
            let mut found: Vec<(TypeDefId, Vec<TypeSig>)> = Vec::new();
            let mut queue = def.interfaces.clone();
            let mut next = 0;
            while let Some(sig) = queue.get(next).cloned() {
                next += 1;
                let TypeSig::Named { def: id, args } = sig else {
                    continue;
                };
                if id == def.id || found.iter().any(|(seen, _)| *seen == id) {
                    continue;
                }
                let inherited = self.type_def(id)?;
                queue.extend(
                    inherited
                        .interfaces
                        .iter()
                        .map(|sig| metadata.substitute(sig, &args)),
                );
                found.push((id, args));
            }
            return Ok(found);
        }

        let mut chain = Vec::new();
        let mut next = def.base_type.clone();
        while let Some(TypeSig::Named { def: base, args }) = next {
            if chain.len() > metadata.type_count() {
                return Err(MetadocError::unclassifiable(
                    metadata.full_name(def.id),
                    "base type chain is cyclic",
                ));
            }
            let base_def = self.type_def(base)?;
            next = base_def
                .base_type
                .as_ref()
                .map(|sig| metadata.substitute(sig, &args));
            chain.push((base, args));
        }
        Ok(chain)
    }

    fn inheritable_members(
        &self,
        type_id: TypeDefId,
    ) -> MetadocResult<Vec<InheritableMember<'m>>> {
        let def = self.type_def(type_id)?;
        let accessors = self.metadata().accessor_methods(type_id);
        let mut members = Vec::new();

        for id in &def.fields {
            let field = self.field_def(*id)?;
            members.push(InheritableMember {
                handle: Handle::Field(*id),
                kind: SlotKind::Field,
                name: &field.name,
                access: field.access,
                explicit_interface: None,
                generic_arity: 0,
                parameters: Vec::new(),
            });
        }
        for id in &def.methods {
            let method = self.method_def(*id)?;
            if accessors.contains(id) || method.is_constructor() {
                continue;
            }
            members.push(InheritableMember {
                handle: Handle::Method(*id),
                kind: SlotKind::Method,
                name: &method.name,
                access: method.access,
                explicit_interface: method.explicit_interface.as_ref(),
                generic_arity: method.generic_params.len(),
                parameters: method.parameters.clone(),
            });
        }
        for id in &def.properties {
            let property = self.property_def(*id)?;
            let Some(primary) = self.primary_accessor(property.getter, property.setter) else {
                continue;
            };
            members.push(InheritableMember {
                handle: Handle::Property(*id),
                kind: SlotKind::Property,
                name: &property.name,
                access: primary.access,
                explicit_interface: property.explicit_interface.as_ref(),
                generic_arity: 0,
                parameters: self.factory().index_parameters(property)?,
            });
        }
        for id in &def.events {
            let event = self.event_def(*id)?;
            let Some(adder) = event.adder.map(|a| self.method_def(a)).transpose()? else {
                continue;
            };
            members.push(InheritableMember {
                handle: Handle::Event(*id),
                kind: SlotKind::Event,
                name: &event.name,
                access: adder.access,
                explicit_interface: event.explicit_interface.as_ref(),
                generic_arity: 0,
                parameters: Vec::new(),
            });
        }
        Ok(members)
    }

    // ========================================================================
    // Interface Implementations
    // ========================================================================

    /// Resolve how each member of each interface of a class or struct is
    /// implemented: explicitly, implicitly by a public member, or by a public
    /// member inherited from a base class.
    pub(super) fn interface_implementations(
        &self,
        def: &TypeDef,
        declared: &DeclaredMembers,
    ) -> MetadocResult<Vec<InterfaceImplementation>> {
        if def.interfaces.is_empty() {
            return Ok(Vec::new());
        }

        let own = self.with_signatures(self.inheritable_members(def.id)?, &[])?;
        let mut inherited = Vec::new();
        for (ancestor, type_args) in self.ancestors(def)? {
            let members = self
                .inheritable_members(ancestor)?
                .into_iter()
                .filter(|m| m.access == Accessibility::Public && m.explicit_interface.is_none())
                .collect();
            inherited.extend(self.with_signatures(members, &type_args)?);
        }

        let mut implementations = Vec::new();
        for interface in &def.interfaces {
            let TypeSig::Named {
                def: interface_id,
                args,
            } = interface
            else {
                continue;
            };
            let interface_type = self.factory().type_reference(interface)?;

            for member in self.inheritable_members(*interface_id)? {
                if member.kind == SlotKind::Field {
                    continue;
                }
                let wanted = self.signature_of(&member, args)?;
                let same_slot =
                    |(candidate, signature): &&(InheritableMember<'m>, MemberSignature)| {
                        candidate.kind == member.kind && *signature == wanted
                    };

                let found = own
                    .iter()
                    .filter(same_slot)
                    .find(|(candidate, _)| candidate.explicit_interface == Some(interface))
                    .map(|(candidate, _)| (candidate, ImplementationKind::Explicit))
                    .or_else(|| {
                        own.iter()
                            .filter(same_slot)
                            .find(|(candidate, _)| {
                                candidate.explicit_interface.is_none()
                                    && candidate.access == Accessibility::Public
                            })
                            .map(|(candidate, _)| (candidate, ImplementationKind::Implicit))
                    })
                    .or_else(|| {
                        inherited
                            .iter()
                            .find(same_slot)
                            .map(|(candidate, _)| (candidate, ImplementationKind::Inherited))
                    });

                let Some((implementation, kind)) = found else {
                    debug!(
                        interface = %interface_type,
                        member = member.name,
                        "no implementation found for interface member"
                    );
                    continue;
                };

                implementations.push(InterfaceImplementation {
                    interface: interface_type.clone(),
                    interface_member: self.member_reference(&member.handle)?,
                    interface_member_name: self.resolver.canonical_name(&member.handle)?,
                    implementation: self.member_reference(&implementation.handle)?,
                    implementation_name: self.resolver.canonical_name(&implementation.handle)?,
                    implementing_member: declared.get(&implementation.handle).copied(),
                    kind,
                });
            }
        }
        Ok(implementations)
    }

    fn with_signatures(
        &self,
        members: Vec<InheritableMember<'m>>,
        type_args: &[TypeSig],
    ) -> MetadocResult<Vec<(InheritableMember<'m>, MemberSignature)>> {
        members
            .into_iter()
            .map(|member| {
                let signature = self.signature_of(&member, type_args)?;
                Ok((member, signature))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadoc_core::fixtures::Sample;

    #[test]
    fn class_ancestors_follow_base_chain() {
        let sample = Sample::new();
        let builder = DeclarationGraphBuilder::with_resolver(sample.resolver());
        let def = sample.metadata.type_def(sample.test_class).unwrap();

        let ancestors: Vec<TypeDefId> = builder
            .ancestors(def)
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ancestors, vec![sample.test_base_class, sample.corlib.object]);
    }

    #[test]
    fn private_base_members_are_not_inherited() {
        let sample = Sample::new();
        let builder = DeclarationGraphBuilder::with_resolver(sample.resolver());
        let def = sample.metadata.type_def(sample.test_class).unwrap();

        let inherited = builder.inherited_signatures(def).unwrap();
        let secret = builder.signature("Secret", 0, &[], &[]).unwrap();
        let virtual_method = builder.signature("VirtualMethod", 0, &[], &[]).unwrap();
        assert!(!inherited.contains(&secret));
        assert!(inherited.contains(&virtual_method));
    }

    #[test]
    fn interface_ancestors_are_inherited_interfaces() {
        let sample = Sample::new();
        let builder = DeclarationGraphBuilder::with_resolver(sample.resolver());
        let def = sample.metadata.type_def(sample.test_interface).unwrap();

        let inherited = builder.inherited_signatures(def).unwrap();
        assert!(inherited.contains(&builder.signature("Run", 0, &[], &[]).unwrap()));
        assert!(inherited.contains(&builder.signature("Changed", 0, &[], &[]).unwrap()));
    }
}
