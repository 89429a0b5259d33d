use rulebook::eligibility::{default_eligibility, eligible_categories, EligibilityTable, RoleMatch};

const CATEGORIES: [&str; 13] = [
    "Best Picture",
    "Best Director",
    "Best Actor",
    "Best Actress",
    "Best Supporting Actor",
    "Best Original Screenplay",
    "Best Cinematography",
    "Best Film Editing",
    "Best Sound",
    "Best Original Score",
    "Best Costume Design",
    "Best Visual Effects",
    "Best Documentary Feature",
];

fn names<'a>(picked: Vec<&&'a str>) -> Vec<&'a str> {
    picked.into_iter().copied().collect()
}

#[test]
fn unrecognized_role_sees_everything() {
    let out = names(eligible_categories("Unrecognized Role", &CATEGORIES));
    assert_eq!(out, CATEGORIES.to_vec());
    assert_eq!(names(eligible_categories("Key Grip", &CATEGORIES)), CATEGORIES.to_vec());
}

#[test]
fn blank_role_sees_everything() {
    assert_eq!(names(eligible_categories("", &CATEGORIES)), CATEGORIES.to_vec());
    assert_eq!(names(eligible_categories("   ", &CATEGORIES)), CATEGORIES.to_vec());
    let (rule, how) = default_eligibility().match_role("  ");
    assert!(rule.is_none());
    assert_eq!(how, RoleMatch::Unrecognized);
}

#[test]
fn exact_role_filters_in_input_order() {
    assert_eq!(names(eligible_categories("Director", &CATEGORIES)), vec!["Best Director"]);
    assert_eq!(names(eligible_categories("DIRECTOR ", &CATEGORIES)), vec!["Best Director"]);
    assert_eq!(
        names(eligible_categories("Director of Photography", &CATEGORIES)),
        vec!["Best Cinematography"]
    );
    assert_eq!(names(eligible_categories("Executive Producer", &CATEGORIES)), vec!["Best Picture"]);
}

#[test]
fn writer_patterns_are_loose() {
    // "original" also catches the score category
    assert_eq!(
        names(eligible_categories("Writer", &CATEGORIES)),
        vec!["Best Original Screenplay", "Best Original Score"]
    );
}

#[test]
fn partial_role_match_either_direction() {
    let table = default_eligibility();

    let (rule, how) = table.match_role("Lead Actor");
    assert_eq!(how, RoleMatch::Partial);
    assert_eq!(rule.map(|r| r.role.as_str()), Some("actor"));
    assert_eq!(
        names(table.eligible_categories("Lead Actor", &CATEGORIES)),
        vec!["Best Actor", "Best Supporting Actor"]
    );

    let (rule, how) = table.match_role("sound");
    assert_eq!(how, RoleMatch::Partial);
    assert_eq!(rule.map(|r| r.role.as_str()), Some("sound designer"));

    assert_eq!(
        names(table.eligible_categories("Movie Star", &CATEGORIES)),
        vec!["Best Actor", "Best Actress", "Best Supporting Actor"]
    );
}

#[test]
fn role_word_match_is_last_resort() {
    let (rule, how) = default_eligibility().match_role("Set Designer");
    assert_eq!(how, RoleMatch::RoleWord);
    assert_eq!(rule.map(|r| r.role.as_str()), Some("sound designer"));

    // a role key inside the position wins before any role word
    let (rule, how) = default_eligibility().match_role("Lead Set Designer");
    assert_eq!(how, RoleMatch::Partial);
    assert_eq!(rule.map(|r| r.role.as_str()), Some("lead"));
}

#[test]
fn generic_acting_roles_see_acting_categories() {
    let all = ["Best Actor", "Best Supporting Actress", "Best Picture", "Best Director"];
    for role in ["Performer", "Lead", "Supporting"] {
        let (_, how) = default_eligibility().match_role(role);
        assert_eq!(how, RoleMatch::Exact, "{role:?}");
        assert_eq!(
            names(eligible_categories(role, &all)),
            vec!["Best Actor", "Best Supporting Actress"],
            "{role:?}"
        );
    }
    assert_eq!(
        names(eligible_categories("Voice Performer", &CATEGORIES)),
        vec!["Best Actor", "Best Actress", "Best Supporting Actor"]
    );
    assert_eq!(
        names(eligible_categories("Screenwriter", &CATEGORIES)),
        vec!["Best Original Screenplay", "Best Original Score"]
    );
}

#[test]
fn recognized_role_without_matches_fails_open() {
    let (rule, how) = default_eligibility().match_role("Animator");
    assert_eq!(how, RoleMatch::Exact);
    assert!(rule.is_some());
    assert_eq!(names(eligible_categories("Animator", &CATEGORIES)), CATEGORIES.to_vec());
}

#[test]
fn works_over_owned_strings() {
    let owned: Vec<String> = CATEGORIES.iter().map(|s| s.to_string()).collect();
    let picked = eligible_categories("Composer", &owned);
    assert_eq!(picked, vec![&owned[9]]);
}

#[test]
fn result_is_always_a_subset() {
    let table = default_eligibility();
    for role in ["Producer", "Editor", "Makeup Artist", "Songwriter", "Gaffer", ""] {
        let picked = table.eligible_categories(role, &CATEGORIES);
        assert!(!picked.is_empty(), "{role:?}");
        assert!(picked.iter().all(|c| CATEGORIES.contains(*c)), "{role:?}");
    }
}

#[test]
fn custom_table() {
    let text = r#"
        name = "tiny"
        version = "0.1"
        role_words = ["grip"]

        [[eligibility]]
        role = "key grip"
        patterns = ["lighting"]
    "#;
    let table = EligibilityTable::from_toml_str(text).expect("valid tiny table");
    let all = ["Best Lighting", "Best Picture"];
    assert_eq!(names(table.eligible_categories("Dolly Grip", &all)), vec!["Best Lighting"]);
    assert_eq!(names(table.eligible_categories("Gaffer", &all)), all.to_vec());
}
