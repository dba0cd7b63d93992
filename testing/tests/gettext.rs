use tolk::{
    gettext, gettext_with, lazy_gettext, lazy_ngettext, ngettext, Domain, Tolk, TolkConfig,
};
use tolk_testing::{fixture_tree, german_config};

#[test]
fn basics() {
    let tree = fixture_tree();
    let tolk = Tolk::new(german_config(tree.path()));

    tolk.enter(|| {
        assert_eq!(
            gettext_with("Hello %(name)s!", &[("name", "Peter")]),
            "Hallo Peter!"
        );
        assert_eq!(ngettext("%(num)s Apple", "%(num)s Apples", 3), "3 Äpfel");
        assert_eq!(ngettext("%(num)s Apple", "%(num)s Apples", 1), "1 Apfel");
    });
}

#[test]
fn no_formatting_without_vars() {
    let tree = fixture_tree();
    let tolk = Tolk::new(german_config(tree.path()));

    tolk.enter(|| {
        // no substitution requested: the literal template survives
        assert_eq!(gettext("Test %s"), "Test %s");
        assert_eq!(gettext_with("Test %(name)s", &[("name", "test")]), "Test test");
        // substitution requested with no matching key leaves the token
        assert_eq!(gettext_with("Test %(name)s", &[]), "Test %(name)s");
    });
}

#[test]
fn lazy_gettext_resolves_at_render_time() {
    let tree = fixture_tree();
    let tolk = Tolk::new(german_config(tree.path()));

    let yes = lazy_gettext("Yes");
    tolk.enter(|| {
        assert_eq!(yes.to_string(), "Ja");
        assert_eq!(yes.html(), "Ja");
    });

    tolk.update_config(|config| config.default_locale = "en_US".into());
    tolk.enter(|| {
        assert_eq!(yes.to_string(), "Yes");
        assert_eq!(yes.html(), "Yes");
    });
}

#[test]
fn lazy_gettext_never_memoizes_at_construction() {
    let tree = fixture_tree();
    let tolk = Tolk::new(german_config(tree.path()));

    // created under a de_DE configuration, but never rendered there
    let yes = lazy_gettext("Yes");
    tolk.update_config(|config| config.default_locale = "en_US".into());

    tolk.enter(|| {
        assert_eq!(yes.to_string(), "Yes");
    });
}

#[test]
fn lazy_ngettext_resolves_at_render_time() {
    let tree = fixture_tree();
    let tolk = Tolk::new(german_config(tree.path()));

    let one_apple = lazy_ngettext("%(num)s Apple", "%(num)s Apples", 1);
    tolk.enter(|| {
        assert_eq!(one_apple.to_string(), "1 Apfel");
        assert_eq!(one_apple.html(), "1 Apfel");
    });

    let two_apples = lazy_ngettext("%(num)s Apple", "%(num)s Apples", 2);
    tolk.enter(|| {
        assert_eq!(two_apples.to_string(), "2 Äpfel");
        assert_eq!(two_apples.html(), "2 Äpfel");
    });
}

#[test]
fn lazy_gettext_follows_the_default_domain() {
    let tree = fixture_tree();
    let tolk = Tolk::new(TolkConfig {
        default_domain: "test".into(),
        ..german_config(tree.path())
    });

    let first = lazy_gettext("first");
    tolk.enter(|| {
        assert_eq!(first.to_string(), "erste");
    });

    tolk.update_config(|config| config.default_locale = "en_US".into());
    tolk.enter(|| {
        assert_eq!(first.to_string(), "first");
    });
}

#[test]
fn list_translations() {
    let tree = fixture_tree();
    let tolk = Tolk::new(german_config(tree.path()));

    let translations = tolk.list_translations();
    assert_eq!(translations.len(), 1);
    assert_eq!(translations[0].to_string(), "de");
}

#[test]
fn explicit_domain_instance() {
    let tree = fixture_tree();
    let tolk = Tolk::new(german_config(tree.path()));

    tolk.enter(|| {
        let domain = Domain::new("test");
        assert_eq!(domain.gettext("first"), "erste");
        // the default domain is unaffected
        assert_eq!(gettext("first"), "first");
    });
}

#[test]
fn as_default_reroutes_free_functions() {
    let tree = fixture_tree();
    let tolk = Tolk::new(german_config(tree.path()));

    tolk.enter(|| {
        let domain = Domain::new("test");
        assert_eq!(gettext("first"), "first");
        domain.as_default().unwrap();
        assert_eq!(gettext("first"), "erste");
    });
}

#[test]
fn configured_default_domain() {
    let tree = fixture_tree();
    let tolk = Tolk::new(TolkConfig {
        default_domain: "test".into(),
        ..german_config(tree.path())
    });

    tolk.enter(|| {
        assert_eq!(gettext("first"), "erste");
    });
}

#[test]
fn applications_do_not_share_caches() {
    let tree = fixture_tree();
    let app1 = Tolk::new(german_config(tree.path()));
    let app2 = Tolk::new(german_config(tree.path()));

    app1.enter(|| {
        assert_eq!(gettext("Yes"), "Ja");
        assert!(app1
            .default_domain()
            .cache_keys()
            .contains(&("de_DE".into(), "messages".into())));
    });

    app2.enter(|| {
        // app1's catalogs are invisible here
        assert!(app2.default_domain().cache_keys().is_empty());
        assert_eq!(gettext("Yes"), "Ja");
    });
}
