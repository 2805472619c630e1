/*
 * Statement Interpreter
 *
 * interpret(env_in, stmt, clinit?) → env_out
 *
 * Every statement starts from a copy of env_in and rebinds at most one
 * local. Assignment right-hand sides:
 *   string primitive call   → primitive result
 *   other call              → no binding (call/return flow functions own it)
 *   local copy              → source value
 *   string literal          → Known(literal)
 *   new <builder type>      → no binding
 *   instance field read     → Unknown
 *   static field read       → static initializer lookup
 *   anything else           → Unknown
 * A standalone string primitive call (`sb.append(x);`, `s.concat(x);`)
 * rebinds its receiver. Identity statements keep the incoming value.
 */

use std::sync::Arc;

use super::static_fields::StaticFieldResolver;
use crate::features::ir::domain::{Constant, InvokeExpr, Local, Method, Place, Rvalue, Stmt};
use crate::features::string_folding::domain::{
    AbstractValue, Environment, PrimitiveRegistry, StringPrimitive,
};

#[derive(Debug, Clone)]
pub struct StringFoldingInterpreter {
    registry: Arc<PrimitiveRegistry>,
}

impl StringFoldingInterpreter {
    pub fn new(registry: Arc<PrimitiveRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PrimitiveRegistry {
        &self.registry
    }

    pub fn interpret(&self, env_in: &Environment, stmt: &Stmt, clinit: Option<&Method>) -> Environment {
        let mut env_out = env_in.clone();

        match stmt {
            Stmt::Assign {
                lhs: Place::Local(dest),
                rhs,
            } => {
                if let Some(value) = self.evaluate(env_in, dest, rhs, clinit) {
                    env_out.bind(dest.clone(), value);
                }
            }
            Stmt::Invoke(expr) => {
                if let (Some(primitive), Some(receiver)) =
                    (self.registry.lookup(&expr.method), expr.base.as_ref())
                {
                    let value = self.apply_primitive(primitive, expr, receiver, env_in);
                    env_out.bind(receiver.clone(), value);
                }
            }
            // Identity binds keep what the call flow seeded; field and array
            // stores and control statements change no local.
            _ => {}
        }

        env_out
    }

    /// Value for `dest := rhs`, or None when the statement binds nothing
    fn evaluate(
        &self,
        env: &Environment,
        dest: &Local,
        rhs: &Rvalue,
        clinit: Option<&Method>,
    ) -> Option<AbstractValue> {
        match rhs {
            Rvalue::Invoke(expr) => self
                .registry
                .lookup(&expr.method)
                .map(|primitive| self.apply_primitive(primitive, expr, dest, env)),
            Rvalue::Local(src) => Some(env.current(src)),
            Rvalue::Constant(Constant::Str(text)) => Some(AbstractValue::Known(text.clone())),
            Rvalue::New(ty) if self.registry.is_builder_type(ty) => None,
            Rvalue::InstanceField { .. } => Some(AbstractValue::Unknown),
            Rvalue::StaticField(field) => Some(
                clinit
                    .map(|clinit| StaticFieldResolver::resolve(field, clinit))
                    .unwrap_or(AbstractValue::Unknown),
            ),
            _ => Some(AbstractValue::Unknown),
        }
    }

    fn apply_primitive(
        &self,
        primitive: StringPrimitive,
        expr: &InvokeExpr,
        target: &Local,
        env: &Environment,
    ) -> AbstractValue {
        let first_arg = || {
            expr.arg(0)
                .map(|arg| env.value_of(arg))
                .unwrap_or(AbstractValue::Unknown)
        };

        match primitive {
            StringPrimitive::Append | StringPrimitive::Concat => {
                let base = expr.base.as_ref().unwrap_or(target);
                env.current(base).concat(&first_arg())
            }
            StringPrimitive::ToString => expr
                .base
                .as_ref()
                .map(|base| env.current(base))
                .unwrap_or(AbstractValue::Unknown),
            StringPrimitive::InitEmpty => AbstractValue::empty(),
            StringPrimitive::InitWithText => first_arg(),
        }
    }
}

impl Default for StringFoldingInterpreter {
    fn default() -> Self {
        Self::new(Arc::new(PrimitiveRegistry::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::ir::domain::{FieldSignature, Immediate, InvokeKind, MethodSignature};
    use crate::features::ir::infrastructure::MethodBuilder;
    use crate::features::string_folding::domain::primitives::signatures;
    use crate::features::string_folding::domain::CallContext;

    fn env(bindings: &[(&str, AbstractValue)]) -> Environment {
        let mut env = Environment::new(CallContext::Entry);
        for (local, value) in bindings {
            env.bind(Local::new(*local), value.clone());
        }
        env
    }

    fn assign(dest: &str, rhs: Rvalue) -> Stmt {
        Stmt::Assign {
            lhs: Place::Local(Local::new(dest)),
            rhs,
        }
    }

    fn virtual_call(base: &str, method: MethodSignature, args: Vec<Immediate>) -> InvokeExpr {
        InvokeExpr::instance(InvokeKind::Virtual, base, method, args)
    }

    fn run(env_in: &Environment, stmts: &[Stmt]) -> Environment {
        let interpreter = StringFoldingInterpreter::default();
        stmts
            .iter()
            .fold(env_in.clone(), |env, stmt| interpreter.interpret(&env, stmt, None))
    }

    #[test]
    fn test_literal_and_copy() {
        let out = run(
            &env(&[("a", AbstractValue::empty()), ("b", AbstractValue::empty())]),
            &[
                assign("a", Rvalue::string("lit")),
                assign("b", Rvalue::Local(Local::new("a"))),
            ],
        );
        assert_eq!(out.current(&Local::new("a")), AbstractValue::known("lit"));
        assert_eq!(out.current(&Local::new("b")), AbstractValue::known("lit"));
    }

    #[test]
    fn test_string_concat_folds() {
        let out = run(
            &env(&[("s", AbstractValue::empty())]),
            &[
                assign("s", Rvalue::string("a")),
                assign(
                    "s",
                    Rvalue::Invoke(virtual_call(
                        "s",
                        signatures::string_concat(),
                        vec![Immediate::string("b")],
                    )),
                ),
            ],
        );
        assert_eq!(out.current(&Local::new("s")), AbstractValue::known("ab"));
    }

    #[test]
    fn test_string_builder_sequence() {
        let out = run(
            &env(&[("sb", AbstractValue::empty()), ("r", AbstractValue::empty())]),
            &[
                assign("sb", Rvalue::New("java.lang.StringBuilder".into())),
                Stmt::Invoke(virtual_call("sb", signatures::builder_init(), vec![])),
                Stmt::Invoke(virtual_call(
                    "sb",
                    signatures::builder_append(),
                    vec![Immediate::string("x")],
                )),
                Stmt::Invoke(virtual_call(
                    "sb",
                    signatures::builder_append(),
                    vec![Immediate::string("y")],
                )),
                assign(
                    "r",
                    Rvalue::Invoke(virtual_call("sb", signatures::builder_to_string(), vec![])),
                ),
            ],
        );
        assert_eq!(out.current(&Local::new("r")), AbstractValue::known("xy"));
    }

    #[test]
    fn test_builder_init_with_text() {
        let out = run(
            &env(&[("sb", AbstractValue::Unknown), ("t", AbstractValue::known("pre"))]),
            &[Stmt::Invoke(virtual_call(
                "sb",
                signatures::builder_init_with_text(),
                vec![Immediate::local("t")],
            ))],
        );
        assert_eq!(out.current(&Local::new("sb")), AbstractValue::known("pre"));
    }

    #[test]
    fn test_chained_append_results() {
        // $r1 = sb.append("a"); $r2 = $r1.append("b")
        let out = run(
            &env(&[("sb", AbstractValue::empty())]),
            &[
                assign(
                    "$r1",
                    Rvalue::Invoke(virtual_call(
                        "sb",
                        signatures::builder_append(),
                        vec![Immediate::string("a")],
                    )),
                ),
                assign(
                    "$r2",
                    Rvalue::Invoke(virtual_call(
                        "$r1",
                        signatures::builder_append(),
                        vec![Immediate::string("b")],
                    )),
                ),
            ],
        );
        assert_eq!(out.current(&Local::new("$r2")), AbstractValue::known("ab"));
    }

    #[test]
    fn test_unknown_argument_poisons_append() {
        let out = run(
            &env(&[("sb", AbstractValue::known("x")), ("u", AbstractValue::Unknown)]),
            &[Stmt::Invoke(virtual_call(
                "sb",
                signatures::builder_append(),
                vec![Immediate::local("u")],
            ))],
        );
        assert_eq!(out.current(&Local::new("sb")), AbstractValue::Unknown);
    }

    #[test]
    fn test_standalone_concat_rebinds_receiver() {
        let out = run(
            &env(&[("s", AbstractValue::known("a"))]),
            &[Stmt::Invoke(virtual_call(
                "s",
                signatures::string_concat(),
                vec![Immediate::string("b")],
            ))],
        );
        assert_eq!(out.current(&Local::new("s")), AbstractValue::known("ab"));
    }

    #[test]
    fn test_standalone_to_string_keeps_receiver() {
        let out = run(
            &env(&[("sb", AbstractValue::known("xy")), ("k", AbstractValue::Unknown)]),
            &[Stmt::Invoke(virtual_call("sb", signatures::builder_to_string(), vec![]))],
        );
        assert_eq!(out.current(&Local::new("sb")), AbstractValue::known("xy"));
        assert_eq!(out.current(&Local::new("k")), AbstractValue::Unknown);
    }

    #[test]
    fn test_builder_new_carries_environment() {
        let before = env(&[("sb", AbstractValue::known("old")), ("k", AbstractValue::known("v"))]);
        let out = run(&before, &[assign("sb", Rvalue::New("java.lang.StringBuilder".into()))]);
        assert_eq!(out, before);
    }

    #[test]
    fn test_other_new_is_unknown() {
        let out = run(
            &env(&[("o", AbstractValue::known("old"))]),
            &[assign("o", Rvalue::New("java.util.ArrayList".into()))],
        );
        assert_eq!(out.current(&Local::new("o")), AbstractValue::Unknown);
    }

    #[test]
    fn test_instance_field_read_is_unknown() {
        let field = FieldSignature::new("A", "name", "java.lang.String");
        let out = run(
            &env(&[("v", AbstractValue::empty()), ("lit", AbstractValue::known("x"))]),
            &[assign(
                "v",
                Rvalue::InstanceField {
                    base: Local::new("this"),
                    field,
                },
            )],
        );
        assert_eq!(out.current(&Local::new("v")), AbstractValue::Unknown);
        assert_eq!(out.current(&Local::new("lit")), AbstractValue::known("x"));
    }

    #[test]
    fn test_static_field_read_uses_clinit() {
        let field = FieldSignature::new("A", "GREETING", "java.lang.String");
        let clinit = MethodBuilder::new("A", "<clinit>")
            .stmt(Stmt::Assign {
                lhs: Place::StaticField(field.clone()),
                rhs: Rvalue::string("hello"),
            })
            .ret_void()
            .build();
        let interpreter = StringFoldingInterpreter::default();
        let stmt = assign("v", Rvalue::StaticField(field));

        let with = interpreter.interpret(&env(&[]), &stmt, Some(&clinit));
        assert_eq!(with.current(&Local::new("v")), AbstractValue::known("hello"));

        let without = interpreter.interpret(&env(&[]), &stmt, None);
        assert_eq!(without.current(&Local::new("v")), AbstractValue::Unknown);
    }

    #[test]
    fn test_other_shapes_are_unknown() {
        let shapes = vec![
            Rvalue::Constant(Constant::Int(1)),
            Rvalue::Constant(Constant::Null),
            Rvalue::Cast {
                ty: "java.lang.String".into(),
                op: Immediate::local("o"),
            },
            Rvalue::BinOp {
                op: "+".into(),
                lhs: Immediate::local("i"),
                rhs: Immediate::Constant(Constant::Int(1)),
            },
            Rvalue::ArrayRead {
                base: Local::new("arr"),
                index: Immediate::Constant(Constant::Int(0)),
            },
            Rvalue::Length(Immediate::local("arr")),
        ];
        for rhs in shapes {
            let out = run(&env(&[("v", AbstractValue::known("x"))]), &[assign("v", rhs)]);
            assert_eq!(out.current(&Local::new("v")), AbstractValue::Unknown);
        }
    }

    #[test]
    fn test_ordinary_call_binds_nothing() {
        let helper = MethodSignature::new("A", "foo", &["java.lang.String"], "java.lang.String");
        let before = env(&[("r", AbstractValue::known("keep"))]);
        let out = run(
            &before,
            &[assign(
                "r",
                Rvalue::Invoke(InvokeExpr::static_call(helper, vec![Immediate::string("hi")])),
            )],
        );
        assert_eq!(out, before);
    }

    #[test]
    fn test_identity_and_control_are_identity() {
        let before = env(&[("p", AbstractValue::known("arg"))]);
        let out = run(
            &before,
            &[
                Stmt::Identity {
                    local: Local::new("p"),
                    rhs: crate::features::ir::domain::IdentityRef::Parameter(0),
                },
                Stmt::Nop,
                Stmt::Goto { target: 0 },
                Stmt::EnterMonitor(Immediate::local("p")),
                Stmt::ExitMonitor(Immediate::local("p")),
                Stmt::Breakpoint,
                Stmt::Throw(Immediate::local("p")),
                Stmt::Return(Immediate::local("p")),
                Stmt::ReturnVoid,
            ],
        );
        assert_eq!(out, before);
    }

    #[test]
    fn test_field_store_is_identity() {
        let before = env(&[("s", AbstractValue::known("x"))]);
        let out = run(
            &before,
            &[Stmt::Assign {
                lhs: Place::StaticField(FieldSignature::new("A", "f", "java.lang.String")),
                rhs: Rvalue::string("y"),
            }],
        );
        assert_eq!(out, before);
    }
}
