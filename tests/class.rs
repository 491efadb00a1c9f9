#[macro_use]
mod common;

#[cfg(test)]
mod class {
    tests! {
        print_class in class is OK
        "Foo"
    }

    tests! {
        print_instance in class is OK
        "Foo instance"
    }

    tests! {
        local_class in class is OK
        "local class"
    }

    tests! {
        inherit_self in class is ERR
        "[line 1] Error at 'Foo': A class cannot inherit from itself"
    }

    tests! {
        inherit_non_class in class is ERR
        "Super class must be a class."
        "[line 2]"
    }
}
