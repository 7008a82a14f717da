//! Type promotion from `is` tests
//!
//! In `if (x is T) ...` and `x is T ? a : b`, a local variable or parameter
//! `x` reads as `T` inside the guarded branch when `T` is more specific than
//! the declared type and the branch never assigns `x`. Conjunctions promote
//! every conjunct; `is!` and disjunctions promote nothing.

use crate::ast::*;
use crate::element::{ElementId, ElementModel, TreeElements};
use corvid_types::{TypeContext, TypeId};
use rustc_hash::FxHashSet;

/// A local whose reads are narrowed to `ty`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promotion {
    pub element: ElementId,
    pub ty: TypeId,
}

/// Promotions established when `condition` evaluates to true
pub fn promotions_from(
    types: &TypeContext,
    model: &ElementModel,
    elements: &TreeElements,
    condition: &Expression,
) -> Vec<Promotion> {
    let send = match condition.unparenthesized() {
        Expression::Send(send) => send,
        _ => return Vec::new(),
    };

    match (&send.selector, send.receiver.as_deref()) {
        (Selector::Is { negated: false, ty }, Some(receiver)) => {
            let element = match local_read(model, elements, receiver) {
                Some(element) => element,
                None => return Vec::new(),
            };
            let (Some(tested), Some(declared)) = (elements.type_of(ty.id), model.get(element).map(|e| e.ty)) else {
                return Vec::new();
            };
            if types.is_dynamic(declared) || tested == declared || !types.is_subtype(tested, declared) {
                return Vec::new();
            }
            vec![Promotion { element, ty: tested }]
        }
        (Selector::Operator(Operator::And), Some(left)) => {
            let mut promotions = promotions_from(types, model, elements, left);
            if let Some(right) = send.arguments().first() {
                promotions.extend(promotions_from(types, model, elements, right.value()));
            }
            promotions
        }
        _ => Vec::new(),
    }
}

/// The local variable or parameter `expr` reads, if it is a plain read
fn local_read(model: &ElementModel, elements: &TreeElements, expr: &Expression) -> Option<ElementId> {
    match expr.unparenthesized() {
        Expression::Send(Send { id, receiver: None, selector: Selector::Name(_), arguments: None, .. }) => {
            let element = elements.get(*id)?;
            model.get(element).filter(|e| e.is_local()).map(|_| element)
        }
        _ => None,
    }
}

/// Locals assigned anywhere in a subtree
#[derive(Debug)]
pub struct AssignmentScan<'a> {
    elements: &'a TreeElements,
    assigned: FxHashSet<ElementId>,
}

impl<'a> AssignmentScan<'a> {
    pub fn new(elements: &'a TreeElements) -> Self {
        AssignmentScan { elements, assigned: FxHashSet::default() }
    }

    pub fn of_statement(elements: &'a TreeElements, stmt: &Statement) -> FxHashSet<ElementId> {
        let mut scan = Self::new(elements);
        scan.visit_statement(stmt);
        scan.assigned
    }

    pub fn of_expression(elements: &'a TreeElements, expr: &Expression) -> FxHashSet<ElementId> {
        let mut scan = Self::new(elements);
        scan.visit_expression(expr);
        scan.assigned
    }
}

impl Visitor for AssignmentScan<'_> {
    fn visit_send_set(&mut self, send_set: &SendSet) {
        if let AssignTarget::Property { receiver: None, .. } = send_set.target {
            if let Some(element) = self.elements.get(send_set.id) {
                self.assigned.insert(element);
            }
        }
        walk_send_set(self, send_set);
    }
}

/// Drop promotions of locals in `assigned`
pub fn retain_unassigned(promotions: Vec<Promotion>, assigned: &FxHashSet<ElementId>) -> Vec<Promotion> {
    promotions
        .into_iter()
        .filter(|p| !assigned.contains(&p.element))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(id: u32) -> Expression {
        Expression::Send(Send {
            id: NodeId(id),
            receiver: None,
            selector: Selector::Name(Identifier { id: NodeId(id + 1000), name: "x".into(), span: Span::default() }),
            arguments: None,
            span: Span::default(),
        })
    }

    fn assign(id: u32) -> Statement {
        Statement::Expression(ExpressionStatement {
            id: NodeId(id + 500),
            expression: Expression::SendSet(SendSet {
                id: NodeId(id),
                target: AssignTarget::Property {
                    receiver: None,
                    name: Identifier { id: NodeId(id + 1000), name: "x".into(), span: Span::default() },
                },
                op: AssignOp::Assign,
                value: Some(Box::new(read(id + 1))),
                span: Span::default(),
            }),
            span: Span::default(),
        })
    }

    #[test]
    fn test_assignment_scan_finds_local_writes() {
        let mut elements = TreeElements::new();
        elements.bind(NodeId(1), ElementId(7));
        elements.bind(NodeId(2), ElementId(8));

        let assigned = AssignmentScan::of_statement(&elements, &assign(1));
        assert!(assigned.contains(&ElementId(7)));
        assert!(!assigned.contains(&ElementId(8)));
    }

    #[test]
    fn test_retain_unassigned() {
        let mut assigned = FxHashSet::default();
        assigned.insert(ElementId(1));
        let promotions = vec![
            Promotion { element: ElementId(1), ty: TypeId::new(3) },
            Promotion { element: ElementId(2), ty: TypeId::new(3) },
        ];
        let kept = retain_unassigned(promotions, &assigned);
        assert_eq!(kept, vec![Promotion { element: ElementId(2), ty: TypeId::new(3) }]);
    }
}
