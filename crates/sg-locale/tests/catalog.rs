use std::fs;

use sg_locale::{Catalog, LocaleError};
use sg_model::{IdeaStatus, Multiloc, RuleDefinition, Topic};
use sg_rules::{Translator, default_registry};
use sg_service::RulesService;
use sg_store::{DataStore, SnapshotBuilder};

#[test]
fn bundled_locales_cover_every_rule_type() {
    let catalog = Catalog::bundled().expect("bundled locales parse");
    assert_eq!(catalog.locales(), ["en", "fr-FR", "nl-NL"]);
    for locale in catalog.locales() {
        for descriptor in default_registry().descriptors() {
            for predicate in descriptor.predicates {
                let key = format!("{}.{predicate}", descriptor.tag);
                assert!(
                    catalog.template(&locale, &key).is_some(),
                    "{locale} has no template for {key}"
                );
            }
        }
    }
}

#[test]
fn falls_back_to_language_then_default_locale() {
    let mut catalog = Catalog::bundled().expect("bundled");
    catalog
        .add_source("fr", "[role]\nis_admin = \"Admin\"\n")
        .expect("fr source");

    assert_eq!(catalog.translate("fr-FR", "role.is_admin", &[]), "Est administrateur");
    assert_eq!(catalog.translate("fr-BE", "role.is_admin", &[]), "Admin");
    assert_eq!(catalog.translate("de-DE", "role.is_admin", &[]), "Is an admin");
    assert_eq!(
        catalog.translate("fr-FR", "email.is", &[("value", "a@b.c")]),
        "L'e-mail est a@b.c"
    );
}

#[test]
fn missing_template_yields_the_key() {
    let catalog = Catalog::bundled().expect("bundled");
    assert_eq!(catalog.translate("en", "unknown.predicate", &[]), "unknown.predicate");
}

#[test]
fn default_locale_is_configurable() {
    let catalog = Catalog::bundled()
        .expect("bundled")
        .with_default_locale("nl-NL");
    assert_eq!(catalog.default_locale(), "nl-NL");
    assert_eq!(catalog.translate("de-DE", "role.is_admin", &[]), "Is beheerder");
}

#[test]
fn extra_locale_files_layer_over_bundled_ones() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("de-DE.toml"), "[role]\nis_admin = \"Ist Admin\"\n").expect("write");
    fs::write(dir.path().join("en.toml"), "[role]\nis_admin = \"Administrator\"\n").expect("write");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    let mut catalog = Catalog::bundled().expect("bundled");
    assert_eq!(catalog.load_dir(dir.path()).expect("load"), 2);
    assert_eq!(catalog.translate("de-DE", "role.is_admin", &[]), "Ist Admin");
    assert_eq!(catalog.translate("en", "role.is_admin", &[]), "Administrator");
    assert_eq!(catalog.translate("en", "role.not_is_admin", &[]), "Is not an admin");
}

#[test]
fn malformed_locale_file_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("en.toml"), "[role\n").expect("write");
    let err = Catalog::default()
        .load_dir(dir.path())
        .expect_err("malformed");
    assert!(matches!(err, LocaleError::Toml { locale, .. } if locale == "en"));
}

#[test]
fn participation_descriptions_in_every_locale() {
    let title: Multiloc = [
        ("en", "in the garbage can"),
        ("fr-FR", "dans la poubelle"),
        ("nl-NL", "in de prullenmand"),
    ]
    .into_iter()
    .collect();
    let snapshot = SnapshotBuilder::new()
        .idea_status(IdeaStatus {
            id: "s1".to_string(),
            title_multiloc: title,
        })
        .build()
        .expect("snapshot");
    let store = DataStore::new(snapshot);
    let service = RulesService::new(default_registry(), &store).expect("service");
    let catalog = Catalog::bundled().expect("bundled");

    let describe = |predicate: &str| {
        service
            .description_multiloc(
                &RuleDefinition::new("participated_in_idea_status", predicate, "s1"),
                &catalog,
            )
            .expect("description")
    };

    let expected: Multiloc = [
        ("en", "Participation in an idea with status in the garbage can"),
        ("fr-FR", "Participation dans une idée avec statut dans la poubelle"),
        ("nl-NL", "Participatie in een idee met status in de prullenmand"),
    ]
    .into_iter()
    .collect();
    assert_eq!(describe("in"), expected);

    let expected: Multiloc = [
        ("en", "Did not vote on a comment on an idea with status in the garbage can"),
        (
            "fr-FR",
            "N'as pas voté pour un commentaire sur une idée avec statut dans la poubelle",
        ),
        ("nl-NL", "Stemde niet op een reactie op een idee met status in de prullenmand"),
    ]
    .into_iter()
    .collect();
    assert_eq!(describe("not_voted_comment_in"), expected);
}

#[test]
fn topic_descriptions_in_every_locale() {
    let title: Multiloc = [("en", "beer"), ("fr-FR", "bière"), ("nl-NL", "bier")]
        .into_iter()
        .collect();
    let snapshot = SnapshotBuilder::new()
        .topic(Topic {
            id: "t1".to_string(),
            title_multiloc: title,
        })
        .build()
        .expect("snapshot");
    let store = DataStore::new(snapshot);
    let service = RulesService::new(default_registry(), &store).expect("service");
    let catalog = Catalog::bundled().expect("bundled");

    let describe = |predicate: &str| {
        service
            .description_multiloc(
                &RuleDefinition::new("participated_in_topic", predicate, "t1"),
                &catalog,
            )
            .expect("description")
    };

    let cases = [
        (
            "in",
            [
                "Participation in an idea with topic beer",
                "Participation dans une idée avec thème bière",
                "Participatie in een idee met thema bier",
            ],
        ),
        (
            "not_in",
            [
                "No participation in an idea with topic beer",
                "Pas de participation dans une idée avec thème bière",
                "Geen participatie in een idee met thema bier",
            ],
        ),
        (
            "posted_in",
            [
                "Posted an idea with topic beer",
                "Posté une idée avec thème bière",
                "Plaatste een idee met thema bier",
            ],
        ),
        (
            "not_commented_in",
            [
                "Did not comment on an idea with topic beer",
                "N'as pas commenté sur une idée avec thème bière",
                "Reageerde niet op een idee met thema bier",
            ],
        ),
        (
            "voted_comment_in",
            [
                "Voted on a comment on an idea with topic beer",
                "Voté pour un commentaire sur une idée avec thème bière",
                "Stemde op een reactie op een idee met thema bier",
            ],
        ),
        (
            "not_voted_comment_in",
            [
                "Did not vote on a comment on an idea with topic beer",
                "N'as pas voté pour un commentaire sur une idée avec thème bière",
                "Stemde niet op een reactie op een idee met thema bier",
            ],
        ),
    ];
    for (predicate, [en, fr, nl]) in cases {
        let expected: Multiloc = [("en", en), ("fr-FR", fr), ("nl-NL", nl)]
            .into_iter()
            .collect();
        assert_eq!(describe(predicate), expected, "{predicate}");
    }
}
