/*
 * Static-Field Resolver
 *
 * Looks a static field up in the designated static initializer. Only a
 * literal string stored directly into the field resolves; anything
 * computed (calls, copies through locals, reads of other fields) is
 * skipped; the first literal store wins, and a field with none stays
 * Unknown.
 */

use crate::features::ir::domain::{Constant, FieldSignature, Method, Rvalue};
use crate::features::string_folding::domain::AbstractValue;

pub struct StaticFieldResolver;

impl StaticFieldResolver {
    pub fn resolve(field: &FieldSignature, clinit: &Method) -> AbstractValue {
        clinit
            .field_initializers()
            .filter(|(stored, _)| *stored == field)
            .find_map(|(_, rhs)| match rhs {
                Rvalue::Constant(Constant::Str(text)) => Some(AbstractValue::Known(text.clone())),
                _ => {
                    tracing::trace!("static field {} stored from non-literal {}", field, rhs);
                    None
                }
            })
            .unwrap_or(AbstractValue::Unknown)
    }
}
