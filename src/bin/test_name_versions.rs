use biogap::name::capitalize_name;
use biogap::subject::{guardian, nytimes, SubjectResolver};
use biogap::xref::similarity_score;

fn main() {
    println!("Name Version Test Tool");
    println!("----------------------");

    // NYTimes persons keywords
    println!("\nNYTimes Name Versions:");
    let bylines = [
        "ROCKEFELLER, JOHN D JR",
        "ROCKEFELLER, JOHN 3D",
        "DE LA MADRID HURTADO, MIGUEL",
        "MCCARTHY, EUGENE J",
        "O'BRIEN, CONAN",
        "X, MALCOLM",
        "BAUMFELD,",
        "Strand, Mark (1934-2014)",
        "John J. Rambo",
    ];

    for byline in &bylines {
        let display = nytimes::strip_life_span(byline);
        println!("'{}'", byline);
        for version in nytimes::name_versions(display) {
            println!("    → '{}'", version);
        }
        println!("    normalized: '{}'", nytimes::normalized_name(display));
    }

    // Guardian web titles
    println!("\nGuardian Subjects:");
    let web_titles = [
        "Obituary: Wally Cole",
        "William E Warwick obituary",
        "Sir Terry Pratchett obituary",
        "Admiral of the Fleet Lord Lewin",
        "Giorgio Armani obituary: Italian fashion designer",
        "Letters: a tribute",
    ];

    for title in &web_titles {
        let subject = guardian::resolve_subject(title);
        println!(
            "'{}' → '{}' (normalized '{}')",
            title, subject.name, subject.normalized_name
        );
    }

    // Capitalization edge cases
    println!("\nCapitalization Tests:");
    for name in ["MACDONALD, RAMSAY", "DI MAGGIO", "VAN DER BERG", "JEAN-PAUL SARTRE", "LOUIS XIV"] {
        println!("'{}' → '{}'", name, capitalize_name(name));
    }

    // Cross-source similarity
    println!("\nCross-Source Scores:");
    let pairs = [
        ("ROCKEFELLER, JOHN D JR", "John D Rockefeller Jr"),
        ("DEVITO, TOMMY", "Tommy DeVito"),
        ("COLE, WALLY", "Walter Cole"),
        ("MARQUEZ, GABRIEL GARCIA", "Gabriel García Márquez"),
    ];

    for (nytimes_name, guardian_name) in &pairs {
        let left = SubjectResolver::NYTimes.normalized_name(nytimes_name);
        let right = SubjectResolver::Guardian.normalized_name(guardian_name);
        println!(
            "'{}' vs '{}' → {}",
            left,
            right,
            similarity_score(&left, &right)
        );
    }
}
