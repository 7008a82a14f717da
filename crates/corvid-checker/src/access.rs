//! Resolution of member and element accesses
//!
//! Every read, call or write of a name is classified into one
//! [`ElementAccess`] before its type is computed.

use crate::ast::Expression;
use crate::checker::{Frame, Site, TypeChecker};
use crate::element::{accessor_type, is_unresolved, ElementId, ElementKind, ElementModel, Member};
use crate::error::{InternalError, InternalErrorKind, MessageKind};
use corvid_types::{Type, TypeContext, TypeId};

/// How a name at a use site was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAccess {
    /// A member found on the static type of the receiver
    Member(Member),
    /// Nothing is known statically
    Dynamic,
    /// A statically bound element: local, parameter, top-level or static member
    Resolved(ElementId),
    /// The callee is an expression of a known type
    Type(TypeId),
    /// A class, typedef or type variable used as a value
    TypeLiteral(ElementId),
}

impl ElementAccess {
    /// The accessed element, if there is one
    pub fn element(&self) -> Option<ElementId> {
        match self {
            ElementAccess::Member(member) => Some(member.element),
            ElementAccess::Resolved(element) | ElementAccess::TypeLiteral(element) => Some(*element),
            ElementAccess::Dynamic | ElementAccess::Type(_) => None,
        }
    }

    /// The static type of the access; `dynamic` when nothing better is known
    pub fn compute_type(&self, types: &TypeContext, model: &ElementModel) -> TypeId {
        let dynamic = types.core().dynamic;
        match self {
            ElementAccess::Member(member) => member.compute_type(types, model),
            ElementAccess::Dynamic => dynamic,
            ElementAccess::Resolved(id) => match model.get(*id) {
                Some(element) => accessor_type(types, element.kind, element.ty),
                None => dynamic,
            },
            ElementAccess::Type(ty) => *ty,
            ElementAccess::TypeLiteral(_) => types.core().type_,
        }
    }

    /// Whether invoking the access can be valid
    pub fn is_callable(&self, types: &TypeContext, model: &ElementModel) -> bool {
        match self {
            ElementAccess::Member(member) => {
                !member.setter_only
                    && types.is_assignable(member.compute_type(types, model), types.core().function)
            }
            ElementAccess::Dynamic
            | ElementAccess::Resolved(_)
            | ElementAccess::Type(_)
            | ElementAccess::TypeLiteral(_) => true,
        }
    }
}

/// Which kind of member a lookup was for; selects the not-found message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Operator,
    Property,
}

/// What stands left of the dot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Receiver {
    /// No receiver: a bare name
    Implicit,
    /// A library prefix or a class naming a static member
    Static,
    /// An expression of the given type
    Typed(TypeId),
}

impl<'a> TypeChecker<'a> {
    /// Resolve `name` on an optional receiver
    ///
    /// The receiver expression, if analyzed, is analyzed exactly once.
    pub(crate) fn compute_access(
        &mut self,
        site: Site,
        receiver: Option<&Expression>,
        name: &str,
        element: Option<ElementId>,
        kind: MemberKind,
        frame: &Frame,
    ) -> Result<ElementAccess, InternalError> {
        let receiver = self.resolve_receiver(receiver, element, frame)?;
        self.access_on(site, receiver, name, element, kind)
    }

    pub(crate) fn resolve_receiver(
        &mut self,
        receiver: Option<&Expression>,
        element: Option<ElementId>,
        frame: &Frame,
    ) -> Result<Receiver, InternalError> {
        let receiver = match receiver {
            Some(receiver) => receiver,
            None => return Ok(Receiver::Implicit),
        };

        if let Some(receiver_element) = self.elements.get(receiver.id()).and_then(|id| self.model.get(id)) {
            if receiver_element.is_prefix() {
                return Ok(Receiver::Static);
            }
            let names_static_member = element
                .and_then(|id| self.model.get(id))
                .is_some_and(|e| e.is_static && e.enclosing_class.is_some());
            if receiver_element.implies_type() && names_static_member {
                return Ok(Receiver::Static);
            }
        }

        Ok(Receiver::Typed(self.analyze(receiver, frame)?))
    }

    pub(crate) fn access_on(
        &mut self,
        site: Site,
        receiver: Receiver,
        name: &str,
        element: Option<ElementId>,
        kind: MemberKind,
    ) -> Result<ElementAccess, InternalError> {
        match receiver {
            Receiver::Implicit | Receiver::Static => self.compute_resolved_access(site, name, element, kind),
            Receiver::Typed(receiver_ty) => Ok(self.lookup_on_receiver(site, receiver_ty, name, kind)),
        }
    }

    /// Member access on a receiver of type `receiver_ty`
    ///
    /// Only interface types are searched. Dynamic, void and malformed
    /// receivers, typedefs, function types and type variables give dynamic
    /// access without a diagnostic.
    pub(crate) fn lookup_on_receiver(
        &mut self,
        site: Site,
        receiver_ty: TypeId,
        name: &str,
        kind: MemberKind,
    ) -> ElementAccess {
        match self.types.get(receiver_ty).as_deref() {
            Some(Type::Interface(_)) => self.lookup_member(site, receiver_ty, name, kind),
            _ => ElementAccess::Dynamic,
        }
    }

    /// Access to a statically bound element
    pub(crate) fn compute_resolved_access(
        &mut self,
        site: Site,
        name: &str,
        element: Option<ElementId>,
        kind: MemberKind,
    ) -> Result<ElementAccess, InternalError> {
        let resolved = element.and_then(|id| self.model.get(id).map(|e| (id, e)));
        let (id, resolved) = match resolved {
            Some((id, e)) if !is_unresolved(Some(e)) => (id, e),
            _ => return Ok(ElementAccess::Dynamic),
        };

        if resolved.is_instance_member() {
            let class = self.current_class.ok_or_else(|| {
                self.internal(InternalErrorKind::NoEnclosingClass { name: name.to_string() })
            })?;
            let this_type = self.types.this_type(class);
            return Ok(self.lookup_member(site, this_type, name, kind));
        }

        match resolved.kind {
            ElementKind::Function
            | ElementKind::Variable
            | ElementKind::Parameter
            | ElementKind::Field
            | ElementKind::Getter
            | ElementKind::Setter => Ok(ElementAccess::Resolved(id)),
            ElementKind::Class | ElementKind::Typedef | ElementKind::TypeVariable => {
                if self.elements.type_of(site.node).is_some() {
                    Ok(ElementAccess::TypeLiteral(id))
                } else {
                    Ok(ElementAccess::Resolved(id))
                }
            }
            ElementKind::Prefix
            | ElementKind::GenerativeConstructor
            | ElementKind::FactoryConstructor
            | ElementKind::Erroneous => Err(self.internal(InternalErrorKind::UnexpectedElement {
                name: resolved.name.clone(),
                kind: format!("{:?}", resolved.kind),
            })),
        }
    }

    /// Find `name` on `receiver_ty`, reporting when it is missing
    pub(crate) fn lookup_member(
        &mut self,
        site: Site,
        receiver_ty: TypeId,
        name: &str,
        kind: MemberKind,
    ) -> ElementAccess {
        if self.types.is_dynamic(receiver_ty) {
            return ElementAccess::Dynamic;
        }
        if let Some(member) = self.model.lookup_member(self.types, receiver_ty, name) {
            return ElementAccess::Member(member);
        }

        let class_name = match self.types.class_of(receiver_ty) {
            Some(class) => self.types.class_name(class),
            None => self.types.display(receiver_ty),
        };
        let member_name = name.to_string();
        let message = match kind {
            MemberKind::Method => MessageKind::MethodNotFound { class_name, member_name },
            MemberKind::Operator => MessageKind::OperatorNotFound { class_name, member_name },
            MemberKind::Property => MessageKind::PropertyNotFound { class_name, member_name },
        };
        self.report(site, message);
        ElementAccess::Dynamic
    }

    /// Type of operator `name` on `receiver_ty`; `dynamic` when missing
    pub(crate) fn lookup_operator_type(&mut self, site: Site, receiver_ty: TypeId, name: &str) -> TypeId {
        self.lookup_on_receiver(site, receiver_ty, name, MemberKind::Operator)
            .compute_type(self.types, self.model)
    }

    pub(crate) fn access_type(&self, access: &ElementAccess, frame: &Frame) -> TypeId {
        if let ElementAccess::Resolved(element) = access {
            if let Some(promoted) = frame.promoted(*element) {
                return promoted;
            }
        }
        access.compute_type(self.types, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_library::install_core_library;
    use crate::element::Element;

    #[test]
    fn test_setter_only_member_is_not_callable() {
        let types = TypeContext::new();
        let mut model = ElementModel::new();
        install_core_library(&types, &mut model);
        let core = *types.core();
        let counter = types.declare_class("Counter", &[]);
        model.add_class(&types, counter);
        let setter = model.add_member(
            counter,
            Element::new("value", ElementKind::Setter, types.simple_function(vec![core.int], core.void)),
        );
        let member = Member { receiver: types.this_type(counter), element: setter, setter_only: true };

        let access = ElementAccess::Member(member);
        assert!(!access.is_callable(&types, &model));
        assert_eq!(access.compute_type(&types, &model), core.int);
        assert_eq!(access.element(), Some(setter));
    }

    #[test]
    fn test_member_callability_follows_function_assignability() {
        let types = TypeContext::new();
        let mut model = ElementModel::new();
        install_core_library(&types, &mut model);
        let core = *types.core();

        let length = model.lookup_member(&types, core.string, "length").unwrap();
        assert!(!ElementAccess::Member(length).is_callable(&types, &model));
        let contains = model.lookup_member(&types, core.string, "contains").unwrap();
        assert!(ElementAccess::Member(contains).is_callable(&types, &model));
        let to_string = model.lookup_member(&types, core.object, "toString").unwrap();
        assert!(ElementAccess::Member(to_string).is_callable(&types, &model));
    }

    #[test]
    fn test_non_member_accesses() {
        let types = TypeContext::new();
        let mut model = ElementModel::new();
        let core = *types.core();
        let getter = model.add(Element::new("answer", ElementKind::Getter, types.simple_function(vec![], core.int)));
        let class = model.add_class(&types, core.string_class);

        assert_eq!(ElementAccess::Dynamic.compute_type(&types, &model), core.dynamic);
        assert_eq!(ElementAccess::Resolved(getter).compute_type(&types, &model), core.int);
        assert_eq!(ElementAccess::TypeLiteral(class).compute_type(&types, &model), core.type_);
        assert_eq!(ElementAccess::Type(core.bool).compute_type(&types, &model), core.bool);
        assert!(ElementAccess::Resolved(getter).is_callable(&types, &model));
        assert!(ElementAccess::Dynamic.element().is_none());
    }
}
