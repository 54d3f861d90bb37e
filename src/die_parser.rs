use crate::rules::{die::WeightedDie, face::FaceValue};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map, map_res, not, opt, recognize},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, pair, preceded, separated_pair, terminated},
};

/// Largest `dN` accepted by [`parse_die`].
pub const MAX_SIDES: u64 = 10_000;

/// Parses a die spec such as `d6`, `H,T` or `1,2,3 [3=2.5]`.
///
/// All faces in one spec must be integers or all must be text. Weights in
/// brackets are applied with [`WeightedDie::change_weight`].
pub fn parse_die(input: &str) -> anyhow::Result<WeightedDie<FaceValue>> {
    let (faces, weights) = match all_consuming(delimited(space0, die_spec, space0)).parse(input) {
        Ok((_, spec)) => spec,
        Err(_) => anyhow::bail!("Failed to parse die spec {input:?}"),
    };
    let faces = match faces {
        Faces::Sided(sides) if sides > MAX_SIDES => {
            anyhow::bail!("Die spec {input:?} has more than {MAX_SIDES} sides")
        }
        Faces::Sided(sides) => (1..=sides as i64).map(FaceValue::Int).collect(),
        Faces::List(faces) => faces,
    };

    if faces.iter().any(FaceValue::is_int) && !faces.iter().all(FaceValue::is_int) {
        anyhow::bail!("Die spec {input:?} mixes integer and text faces");
    }

    let mut die = WeightedDie::new(faces)?;
    for (face, weight) in weights.unwrap_or_default() {
        die.change_weight(&face, weight)?;
    }
    Ok(die)
}

enum Faces {
    Sided(u64),
    List(Vec<FaceValue>),
}

type DieSpec = (Faces, Option<Vec<(FaceValue, f64)>>);

fn die_spec(input: &str) -> IResult<&str, DieSpec> {
    // `d6,d8` is a list of two text faces, not a six-sided die
    let sided = map(
        terminated(sided, not(preceded(space0, char(',')))),
        Faces::Sided,
    );
    let list = map(face_list, Faces::List);
    (alt((sided, list)), opt(preceded(space0, weights))).parse(input)
}

/// `dN` as a whole word; `d6x` is left for the text-face branch.
fn sided(input: &str) -> IResult<&str, u64> {
    all_consuming_word(preceded(
        char('d'),
        map(digit1, |s: &str| s.parse::<u64>().unwrap_or(u64::MAX)),
    ))
    .parse(input)
}

fn face_list(input: &str) -> IResult<&str, Vec<FaceValue>> {
    separated_list1(delimited(space0, char(','), space0), face).parse(input)
}

fn face(input: &str) -> IResult<&str, FaceValue> {
    alt((
        map(
            all_consuming_word(map_res(
                recognize(pair(opt(char('-')), digit1)),
                |s: &str| s.parse::<i64>(),
            )),
            FaceValue::Int,
        ),
        map(word, |s: &str| FaceValue::Text(s.to_string())),
    ))
    .parse(input)
}

/// Runs `inner` on the next word only, so `3a` is text rather than `3`
/// followed by garbage.
fn all_consuming_word<'a, O>(
    inner: impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>> {
    let mut inner = all_consuming(inner);
    move |input: &'a str| -> IResult<&'a str, O> {
        let (rest, token) = word(input)?;
        let (_, value) = inner.parse(token)?;
        Ok((rest, value))
    }
}

fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !",[]=".contains(c)).parse(input)
}

fn weights(input: &str) -> IResult<&str, Vec<(FaceValue, f64)>> {
    delimited(
        char('['),
        separated_list1(
            delimited(space0, char(','), space0),
            separated_pair(
                preceded(space0, face),
                delimited(space0, char('='), space0),
                double,
            ),
        ),
        preceded(space0, char(']')),
    )
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::face::Weight;

    #[test]
    fn test_parse_sided() {
        let die = parse_die("d6 [6=2]").unwrap();
        assert_eq!(die.weight(&FaceValue::Int(6)).map(Weight::value), Some(2.0));

        let die = parse_die("d6").unwrap();
        let faces: Vec<FaceValue> = die.faces().cloned().collect();
        assert_eq!(faces, (1..=6).map(FaceValue::Int).collect::<Vec<_>>());
        assert!(die.faces_and_weights().iter().all(|fw| fw.weight == Weight::ONE));
    }

    #[test]
    fn test_parse_list_with_weights() {
        let die = parse_die("1, 2, 3 [3 = 2.5, 1=0]").unwrap();
        assert_eq!(die.len(), 3);
        assert_eq!(die.weight(&FaceValue::Int(3)).map(Weight::value), Some(2.5));
        assert_eq!(die.weight(&FaceValue::Int(1)).map(Weight::value), Some(0.0));
        assert_eq!(die.weight(&FaceValue::Int(2)), Some(Weight::ONE));
    }

    #[test]
    fn test_parse_text_faces() {
        let die = parse_die("H,T [H=3]").unwrap();
        let faces: Vec<String> = die.faces().map(ToString::to_string).collect();
        assert_eq!(faces, vec!["H", "T"]);
        assert_eq!(die.weight(&"H".into()).map(Weight::value), Some(3.0));

        let die = parse_die("3a,-2b").unwrap();
        assert!(die.faces().all(|face| !face.is_int()));

        let die = parse_die("d6,d8").unwrap();
        assert_eq!(die.len(), 2);
        assert!(die.contains(&"d8".into()));

        let die = parse_die("d6x,foo").unwrap();
        assert_eq!(die.len(), 2);
        assert!(die.contains(&"d6x".into()));
        assert!(die.contains(&"foo".into()));

        let die = parse_die("d6x [d6x=2]").unwrap();
        assert_eq!(die.len(), 1);
        assert_eq!(die.weight(&"d6x".into()).map(Weight::value), Some(2.0));

        let die = parse_die("d6x").unwrap();
        assert_eq!(die.faces().cloned().collect::<Vec<_>>(), vec![FaceValue::from("d6x")]);
    }

    #[test]
    fn test_parse_sided_limit() {
        assert_eq!(parse_die("d10000").unwrap().len(), 10_000);

        let err = parse_die("d3000000000").unwrap_err();
        assert!(err.to_string().contains("more than 10000 sides"));
        // too large for u64 is still a sided die, not a text face
        assert!(parse_die("d99999999999999999999999").is_err());
        assert!(parse_die("d0").is_err());
    }

    #[test]
    fn test_parse_negative_int_faces() {
        let die = parse_die("-1,0,1").unwrap();
        assert!(die.contains(&FaceValue::Int(-1)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_die("").is_err());
        assert!(parse_die("1,H").is_err());
        assert!(parse_die("1,1,2").is_err());
        assert!(parse_die("1,2 [3=1.0]").is_err());
        assert!(parse_die("1,2 [1=-1.0]").is_err());
        assert!(parse_die("1,2 [1=1.0").is_err());
    }
}
