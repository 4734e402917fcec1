use rand::{Rng, seq::IndexedRandom};

const WORDS: &[&str] = &[
    "alias", "consequatur", "aut", "perferendis", "sit", "voluptatem", "accusantium",
    "doloremque", "aperiam", "eaque", "ipsa", "quae", "ab", "illo", "inventore", "veritatis",
    "et", "quasi", "architecto", "beatae", "vitae", "dicta", "sunt", "explicabo", "aspernatur",
    "odit", "fugit", "sed", "quia", "consequuntur", "magni", "dolores", "eos", "qui",
    "ratione", "sequi", "nesciunt", "neque", "dolorem", "ipsum", "dolor", "amet",
    "consectetur", "adipisci", "velit", "non", "numquam", "eius", "modi", "tempora",
    "incidunt", "ut", "labore", "dolore", "magnam", "aliquam", "quaerat", "enim", "ad",
    "minima", "veniam", "quis", "nostrum", "exercitationem", "ullam", "corporis",
    "nemo", "ipsam", "voluptas", "suscipit", "laboriosam", "nisi", "aliquid", "ex", "ea",
    "commodi", "autem", "vel", "eum", "iure", "reprehenderit", "in", "voluptate", "esse",
    "quam", "nihil", "molestiae", "iusto", "odio", "dignissimos", "ducimus", "blanditiis",
    "praesentium", "laudantium", "totam", "rem", "voluptatum", "deleniti", "atque",
    "corrupti", "quos", "quas", "molestias", "excepturi", "sint", "occaecati", "cupiditate",
    "provident", "perspiciatis", "unde", "omnis", "iste", "natus", "error", "similique",
    "culpa", "officia", "deserunt", "mollitia", "animi", "id", "est", "laborum", "harum",
    "quidem", "rerum", "facilis", "expedita", "distinctio", "nam", "libero", "tempore",
    "cum", "soluta", "nobis", "eligendi", "optio", "cumque", "impedit", "quo", "porro",
    "minus", "maxime", "placeat", "facere", "possimus", "assumenda", "repellendus",
    "temporibus", "quibusdam", "illum", "fugiat", "nulla", "pariatur", "at", "vero",
    "accusamus", "officiis", "debitis", "necessitatibus", "saepe", "eveniet", "et",
    "voluptates", "repudiandae", "recusandae", "itaque", "earum", "hic", "tenetur", "a",
    "sapiente", "delectus", "reiciendis", "voluptatibus", "maiores", "doloribus",
    "asperiores", "repellat",
];

/// A capitalized lorem sentence ending in a period.
///
/// With `variable` set the word count is drawn from 60%..=140% of `nb_words`.
pub fn sentence<R: Rng + ?Sized>(rng: &mut R, nb_words: usize, variable: bool) -> String {
    let n = if variable {
        let lo = (nb_words * 60 / 100).max(1);
        let hi = (nb_words * 140 / 100).max(lo);
        rng.random_range(lo..=hi)
    } else {
        nb_words.max(1)
    };

    let mut words: Vec<&str> = Vec::with_capacity(n);
    for _ in 0..n {
        if let Some(w) = WORDS.choose(rng) {
            words.push(*w);
        }
    }

    let mut out = words.join(" ");
    if let Some(first) = out.get(..1) {
        let upper = first.to_ascii_uppercase();
        out.replace_range(..1, &upper);
    }
    out.push('.');
    out
}
