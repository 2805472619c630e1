//! Program fixtures
//!
//! Each fixture is a small Jimple-like program under `jlink.Test`. Statement
//! indices are noted next to each fixture so tests can query program points.

use std::sync::Arc;
use strfold_ir::features::ir::domain::{
    FieldSignature, Immediate, InvokeExpr, InvokeKind, MethodSignature, Place, Rvalue, Stmt,
};
use strfold_ir::features::string_folding::domain::primitives::signatures;
use strfold_ir::{MethodBuilder, Program};

pub const CLASS: &str = "jlink.Test";

pub fn foo_sig() -> MethodSignature {
    MethodSignature::new(CLASS, "foo", &["java.lang.String"], "java.lang.String")
}

pub fn string_field(name: &str) -> FieldSignature {
    FieldSignature::new(CLASS, name, "java.lang.String")
}

/// `String foo(String p) { return p; }`
pub fn identity_foo() -> MethodBuilder {
    MethodBuilder::new(CLASS, "foo")
        .returns("java.lang.String")
        .param("p", "java.lang.String")
        .ret(Immediate::local("p"))
}

/// `<clinit>`: GREETING = "hello"; $r0 = foo("Sonia"); COMPUTED = $r0
pub fn clinit() -> MethodBuilder {
    MethodBuilder::new(CLASS, "<clinit>")
        .stmt(Stmt::Assign {
            lhs: Place::StaticField(string_field("GREETING")),
            rhs: Rvalue::string("hello"),
        })
        .assign(
            "$r0",
            Rvalue::Invoke(InvokeExpr::static_call(
                foo_sig(),
                vec![Immediate::string("Sonia")],
            )),
        )
        .stmt(Stmt::Assign {
            lhs: Place::StaticField(string_field("COMPUTED")),
            rhs: Rvalue::Local("$r0".into()),
        })
        .ret_void()
}

/// Program from `main` plus the shared `foo` and `<clinit>`
pub fn program_with_main(main: MethodBuilder) -> Arc<Program> {
    let mut program = Program::new();
    program.add_method(main.build());
    program.add_method(identity_foo().build());
    program.add_method(clinit().build());
    Arc::new(program)
}

pub fn call(base: &str, method: MethodSignature, args: Vec<Immediate>) -> InvokeExpr {
    InvokeExpr::instance(InvokeKind::Virtual, base, method, args)
}

pub fn foo(arg: Immediate) -> Rvalue {
    Rvalue::Invoke(InvokeExpr::static_call(foo_sig(), vec![arg]))
}

/// 0: s = "a"; 1: s = s.concat("b"); 2: return
pub fn concat_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign_str("s", "a")
            .assign(
                "s",
                Rvalue::Invoke(call("s", signatures::string_concat(), vec![Immediate::string("b")])),
            )
            .ret_void(),
    )
}

/// 0: sb = new StringBuilder; 1: sb.<init>(); 2: sb.append("x");
/// 3: sb.append("y"); 4: r = sb.toString(); 5: return
pub fn builder_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign("sb", Rvalue::New("java.lang.StringBuilder".into()))
            .invoke(InvokeExpr::instance(
                InvokeKind::Special,
                "sb",
                signatures::builder_init(),
                vec![],
            ))
            .invoke(call("sb", signatures::builder_append(), vec![Immediate::string("x")]))
            .invoke(call("sb", signatures::builder_append(), vec![Immediate::string("y")]))
            .assign(
                "r",
                Rvalue::Invoke(call("sb", signatures::builder_to_string(), vec![])),
            )
            .ret_void(),
    )
}

/// javac shape of `"<" + name + ">"`:
/// 0: name = "x"; 1: $r0 = new StringBuilder; 2: $r0.<init>("<");
/// 3: $r1 = $r0.append(name); 4: $r2 = $r1.append(">"); 5: r = $r2.toString(); 6: return
pub fn chained_builder_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign_str("name", "x")
            .assign("$r0", Rvalue::New("java.lang.StringBuilder".into()))
            .invoke(InvokeExpr::instance(
                InvokeKind::Special,
                "$r0",
                signatures::builder_init_with_text(),
                vec![Immediate::string("<")],
            ))
            .assign(
                "$r1",
                Rvalue::Invoke(call("$r0", signatures::builder_append(), vec![Immediate::local("name")])),
            )
            .assign(
                "$r2",
                Rvalue::Invoke(call("$r1", signatures::builder_append(), vec![Immediate::string(">")])),
            )
            .assign(
                "r",
                Rvalue::Invoke(call("$r2", signatures::builder_to_string(), vec![])),
            )
            .ret_void(),
    )
}

/// 0: u = "keep"; 1: r = foo("hi"); 2: return
pub fn call_return_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign_str("u", "keep")
            .assign("r", foo(Immediate::string("hi")))
            .ret_void(),
    )
}

/// 0: t = "tt"; 1: r = foo(t); 2: return
pub fn call_with_variable_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign_str("t", "tt")
            .assign("r", foo(Immediate::local("t")))
            .ret_void(),
    )
}

/// 0: u = "keep"; 1: foo("x"); 2: return
pub fn unassigned_call_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign_str("u", "keep")
            .invoke(InvokeExpr::static_call(foo_sig(), vec![Immediate::string("x")]))
            .ret_void(),
    )
}

/// 0: a = foo("a"); 1: b = foo("b"); 2: return
pub fn two_call_sites_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign("a", foo(Immediate::string("a")))
            .assign("b", foo(Immediate::string("b")))
            .ret_void(),
    )
}

/// 0: o = new jlink.Test; 1: v = o.name; 2: return
pub fn instance_field_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign("o", Rvalue::New(CLASS.into()))
            .assign(
                "v",
                Rvalue::InstanceField {
                    base: "o".into(),
                    field: string_field("name"),
                },
            )
            .ret_void(),
    )
}

/// 0: v = GREETING; 1: w = COMPUTED; 2: return
pub fn static_field_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign("v", Rvalue::StaticField(string_field("GREETING")))
            .assign("w", Rvalue::StaticField(string_field("COMPUTED")))
            .ret_void(),
    )
}

/// 0: if c goto 3; 1: s = "x"; 2: goto 4; 3: s = "y"; 4: t = "z"; 5: return
pub fn branch_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .local("s")
            .stmt(Stmt::If {
                condition: "c == 0".into(),
                target: 3,
            })
            .assign_str("s", "x")
            .stmt(Stmt::Goto { target: 4 })
            .assign_str("s", "y")
            .assign_str("t", "z")
            .ret_void(),
    )
}

/// 0: s = "a"; 1: s.concat("b"); 2: return
pub fn standalone_concat_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign_str("s", "a")
            .invoke(call("s", signatures::string_concat(), vec![Immediate::string("b")]))
            .ret_void(),
    )
}

/// 0: s = "a"; 1: if c goto 4; 2: s = s.concat("b"); 3: goto 1; 4: return
///
/// Every trip around the loop produces a new environment.
pub fn growing_loop_program() -> Arc<Program> {
    program_with_main(
        MethodBuilder::new(CLASS, "main")
            .assign_str("s", "a")
            .stmt(Stmt::If {
                condition: "c == 0".into(),
                target: 4,
            })
            .assign(
                "s",
                Rvalue::Invoke(call("s", signatures::string_concat(), vec![Immediate::string("b")])),
            )
            .stmt(Stmt::Goto { target: 1 })
            .ret_void(),
    )
}

/// `String wrap(String p) { sb = new StringBuilder(p); sb.append("!"); return sb.toString(); }`
/// main: 0: r = wrap("hey"); 1: return
pub fn builder_in_callee_program() -> Arc<Program> {
    let wrap_sig =
        MethodSignature::new(CLASS, "wrap", &["java.lang.String"], "java.lang.String");
    let wrap = MethodBuilder::new(CLASS, "wrap")
        .returns("java.lang.String")
        .param("p", "java.lang.String")
        .assign("sb", Rvalue::New("java.lang.StringBuilder".into()))
        .invoke(InvokeExpr::instance(
            InvokeKind::Special,
            "sb",
            signatures::builder_init_with_text(),
            vec![Immediate::local("p")],
        ))
        .invoke(call("sb", signatures::builder_append(), vec![Immediate::string("!")]))
        .assign(
            "res",
            Rvalue::Invoke(call("sb", signatures::builder_to_string(), vec![])),
        )
        .ret(Immediate::local("res"));
    let main = MethodBuilder::new(CLASS, "main")
        .assign(
            "r",
            Rvalue::Invoke(InvokeExpr::static_call(wrap_sig, vec![Immediate::string("hey")])),
        )
        .ret_void();

    let mut program = Program::new();
    program.add_method(main.build());
    program.add_method(wrap.build());
    program.add_method(clinit().build());
    Arc::new(program)
}
