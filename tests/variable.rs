#[macro_use]
mod common;

#[cfg(test)]
mod variable {
    tests! {
        shadow_block in variable is OK
        "inner"
        "outer"
    }

    tests! {
        early_bound in variable is OK
        "outer"
        "outer"
    }

    tests! {
        uninitialized in variable is OK
        "nil"
    }

    tests! {
        redefine_global in variable is OK
        "2"
    }

    tests! {
        duplicate_local in variable is ERR
        "[line 3] Error at 'a': Variable with name 'a' already declared in this scope"
    }

    tests! {
        use_local_in_initializer in variable is ERR
        "[line 2] Error at 'a': Can not read local variable in its own initializer"
    }

    tests! {
        undefined_global in variable is ERR
        "Undefined variable 'notDefined'."
        "[line 1]"
    }

    tests! {
        assign_undefined in variable is ERR
        "Cannot assign value to undefined variable 'notDefined'."
        "[line 1]"
    }

    tests! {
        invalid_assignment_target in variable is ERR
        "[line 3] Error at '=': Invalid assignment target."
    }
}
