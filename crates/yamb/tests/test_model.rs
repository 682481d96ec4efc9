//! Behaviour of typed facades declared with `model!`.

use pretty_assertions::assert_eq;
use serde::Deserialize;
use yamb::{Error, Format, Json, Model, Node, Value, model};

model! {
    pub struct Foo {
        bar: Attr,
        baz: Attr,
    }
}

model! {
    pub struct Bar {
        foo: Another<Foo>,
        thing: Attr,
    }
}

model! {
    pub struct Thing {
        value: Attr,
    }
}

model! {
    pub struct Lots {
        things: Many<Thing>,
    }
}

model! {
    /// Self-referencing class.
    pub struct Tree {
        label: Attr,
        children: Many<Tree>,
    }
}

fn parsed(text: &str) -> serde_yaml::Value {
    serde_yaml::from_str(text).unwrap()
}

fn foo(bar: impl Into<Value>, baz: impl Into<Value>) -> Foo {
    Foo::with_fields([("bar", bar.into()), ("baz", baz.into())]).unwrap()
}

fn thing(value: impl Into<Value>) -> Thing {
    Thing::with_fields([("value", value.into())]).unwrap()
}

fn lots(things: Vec<Thing>) -> Lots {
    let things = things.into_iter().map(Model::into_object).collect::<Vec<_>>();
    Lots::with_fields([("things", Value::from(things))]).unwrap()
}

#[test]
fn test_load() {
    let foo = Foo::load("\nbar: 1\nbaz: 'ololo'\n    ").unwrap();
    assert_eq!(foo.bar().get(), 1);
    assert_eq!(foo.baz().get(), "ololo");
}

#[test]
fn test_save() {
    let foo = foo(2, "pewpew");
    assert_eq!(parsed(&foo.dump().unwrap()), parsed("{bar: 2, baz: pewpew}"));
}

#[test]
fn test_save_deserializes_into_struct() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Plain {
        bar: i64,
        baz: String,
    }

    let text = foo(2, "pewpew").dump().unwrap();
    let plain: Plain = serde_yaml::from_str(&text).unwrap();
    assert_eq!(
        plain,
        Plain {
            bar: 2,
            baz: "pewpew".to_string()
        }
    );
}

#[test]
fn test_default_load() {
    model! {
        struct Five {
            a: Attr = 5,
        }
    }
    model! {
        struct Letter {
            a: Attr = "a",
        }
    }
    model! {
        struct Empty {
            a: Attr = Vec::<Node>::new(),
        }
    }

    assert_eq!(Five::load("{}").unwrap().a().get(), 5);
    assert_eq!(Letter::load("{}").unwrap().a().get(), "a");
    assert_eq!(Empty::load("{}").unwrap().a().get(), Node::from(Vec::new()));
}

#[test]
fn test_default_not_shared_between_instances() {
    model! {
        struct Empty {
            a: Attr = Vec::<Node>::new(),
        }
    }

    let first = Empty::new();
    first.a().get().as_sequence().unwrap().push(Node::from(1));
    assert_eq!(Empty::new().a().get(), Node::from(Vec::new()));
    assert!(first.fragment().is_empty());
}

#[test]
fn test_roundabout_save() {
    let foo = foo(2, 3);
    foo.bar().set(5).unwrap();

    assert_eq!(foo.bar().get(), 5);
    assert_eq!(Foo::load(&foo.dump().unwrap()).unwrap().bar().get(), 5);
}

#[test]
fn test_another_load() {
    let bar = Bar::load("\nfoo:\n   bar: 1\n   baz: 2\n    ").unwrap();
    let foo = bar.foo().get().unwrap().unwrap();
    assert_eq!(foo.bar().get(), 1);
    assert_eq!(foo.baz().get(), 2);
}

#[test]
fn test_another_save() {
    let bar = Bar::new();
    bar.foo().set(&foo("test", "values")).unwrap();
    assert_eq!(
        parsed(&bar.dump().unwrap()),
        parsed("foo: {bar: test, baz: values}")
    );
}

#[test]
fn test_another_update() {
    let bar = Bar::new();
    bar.foo().set(&foo("test", "values")).unwrap();
    bar.foo().get().unwrap().unwrap().baz().set("ololo").unwrap();
    assert_eq!(
        parsed(&bar.dump().unwrap()),
        parsed("foo: {bar: test, baz: ololo}")
    );
}

#[test]
fn test_another_as_argument() {
    let bar = Bar::with_fields([("foo", foo("test", "values").to_value())]).unwrap();
    assert_eq!(
        parsed(&bar.dump().unwrap()),
        parsed("foo: {bar: test, baz: values}")
    );
}

#[test]
fn test_another_absent_and_cleared() {
    let bar = Bar::new();
    assert!(bar.foo().get().unwrap().is_none());

    bar.foo().set(&Foo::new()).unwrap();
    assert!(bar.foo().get().unwrap().is_some());

    bar.foo().clear().unwrap();
    assert!(bar.foo().get().unwrap().is_none());
    assert_eq!(parsed(&bar.dump().unwrap()), parsed("foo: null"));
}

#[test]
fn test_many_load() {
    let lots = Lots::load("\nthings:\n   - value: 2\n   - value: 3\n   - value: 4\n    ").unwrap();
    let things = lots.things().get().unwrap().unwrap();
    let values: Vec<Node> = things.iter().map(|t| t.unwrap().value().get()).collect();
    assert_eq!(values, vec![Node::from(2), Node::from(3), Node::from(4)]);
}

#[test]
fn test_many_save() {
    let lots = Lots::new();
    lots.things().set([thing(2), thing(3)]).unwrap();
    assert_eq!(
        parsed(&lots.dump().unwrap()),
        parsed("things: [{value: 2}, {value: 3}]")
    );
}

#[test]
fn test_many_append_push() {
    let lots = Lots::new();
    lots.things().set([thing("a")]).unwrap();
    lots.things().get().unwrap().unwrap().push(&thing("b"));
    assert_eq!(
        parsed(&lots.dump().unwrap()),
        parsed("things: [{value: a}, {value: b}]")
    );
}

#[test]
fn test_many_append_add_assign() {
    let lots = Lots::new();
    lots.things().set([thing("a")]).unwrap();
    let mut things = lots.things().get().unwrap().unwrap();
    things += vec![thing("b")];
    assert_eq!(
        parsed(&lots.dump().unwrap()),
        parsed("things: [{value: a}, {value: b}]")
    );
}

#[test]
fn test_many_del() {
    let lots = Lots::new();
    lots.things().set([thing("1")]).unwrap();
    lots.things().get().unwrap().unwrap().remove(0).unwrap();
    assert_eq!(parsed(&lots.dump().unwrap()), parsed("things: []"));
}

#[test]
fn test_many_set() {
    let lots = lots(vec![thing("1")]);
    lots.things().get().unwrap().unwrap().set(0, &thing("foo")).unwrap();
    assert_eq!(parsed(&lots.dump().unwrap()), parsed("things: [{value: foo}]"));
}

#[test]
fn test_many_set_item_field() {
    let lots = lots(vec![thing("1")]);
    let things = lots.things().get().unwrap().unwrap();
    things.get(0).unwrap().value().set("foo").unwrap();
    assert_eq!(parsed(&lots.dump().unwrap()), parsed("things: [{value: foo}]"));
}

#[test]
fn test_many_set_item_field_from_empty() {
    let lots = lots(vec![]);
    let things = lots.things().get().unwrap().unwrap();
    things.push(&thing("1"));
    things.get(0).unwrap().value().set("foo").unwrap();
    assert_eq!(parsed(&lots.dump().unwrap()), parsed("things: [{value: foo}]"));
}

#[test]
fn test_many_as_arg() {
    let lots = lots(vec![thing("1")]);
    assert_eq!(parsed(&lots.dump().unwrap()), parsed("things: [{value: '1'}]"));
}

#[test]
fn test_many_insert_and_out_of_range() {
    let lots = lots(vec![thing(1), thing(3)]);
    let things = lots.things().get().unwrap().unwrap();
    things.insert(1, &thing(2)).unwrap();
    assert_eq!(things.len(), 3);
    assert_eq!(
        things.get(5).unwrap_err(),
        Error::IndexOutOfBounds {
            index: 5,
            length: 3
        }
    );
    assert_eq!(
        parsed(&lots.dump().unwrap()),
        parsed("things: [{value: 1}, {value: 2}, {value: 3}]")
    );
}

#[test]
fn test_two_reads_share_state() {
    let lots = lots(vec![thing(1)]);
    let first = lots.things().get().unwrap().unwrap();
    let second = lots.things().get().unwrap().unwrap();
    first.push(&thing(2));
    assert_eq!(second.len(), 2);
}

#[test]
fn test_recursive_model() {
    let tree = Tree::load("label: root\nchildren:\n- label: a\n  children:\n  - label: b\n").unwrap();
    let children = tree.children().get().unwrap().unwrap();
    let a = children.get(0).unwrap();
    let grandchildren = a.children().get().unwrap().unwrap();
    assert_eq!(grandchildren.get(0).unwrap().label().get(), "b");

    let leaf = Tree::new();
    leaf.label().set("c").unwrap();
    grandchildren.push(&leaf);
    assert_eq!(
        parsed(&tree.dump().unwrap()),
        parsed("{label: root, children: [{label: a, children: [{label: b}, {label: c}]}]}")
    );
}

#[test]
fn test_nondeclared_attributes_at_constructor() {
    let err = Thing::with_fields([("not_there", Value::from(5))]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Thing"), "{message}");
    assert!(message.contains("unknown"), "{message}");
    assert!(message.contains("not_there"), "{message}");
}

#[test]
fn test_nondeclared_attributes_on_instance() {
    let thing = thing(5);
    let object = thing.as_object();
    assert!(matches!(
        object.get("not_there"),
        Err(Error::UnknownAttribute { .. })
    ));
    assert!(matches!(
        object.set("not_there", 123),
        Err(Error::UnknownAttribute { .. })
    ));
}

#[test]
fn test_fields_settable() {
    model! {
        struct Test {
            a: Attr,
            b: Unmanaged,
        }
    }

    let x = Test::new();
    assert_eq!(x.b().get(), Node::Null);
    x.b().set(5).unwrap();
    assert_eq!(x.b().get(), 5);
    assert_eq!(x.dump().unwrap(), "{}\n");
}

#[test]
fn test_json_codec() {
    let foo = Foo::load_with(r#"{"bar": 1, "baz": "x"}"#, &Json::default()).unwrap();
    foo.bar().set(2).unwrap();
    assert_eq!(foo.dump_with(&Json::default()).unwrap(), r#"{"bar":2,"baz":"x"}"#);

    let format: Format = "json".parse().unwrap();
    assert_eq!(Foo::load_with(r#"{"bar": 2, "baz": "x"}"#, &format).unwrap(), foo);
}
