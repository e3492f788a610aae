#![allow(dead_code)]

//! Fixed-width CIF lines for tests.

pub fn station(name: &str, location: &str, code: &str) -> String {
    format!("A    {name:<26}     {location:<7}{code:<3}   {code:<3}\n")
}

pub fn header(transaction: char, uid: &str, from: &str, to: &str, days: &str) -> String {
    format!("BS{transaction}{uid:<6}{from}{to}{days} POO2N53    122112000 DMUS   075      S            P\n")
}

pub fn details() -> String {
    format!("BX         SWY{:67}\n", "")
}

pub fn origin(location: &str, time: &str, platform: &str) -> String {
    format!("LO{location:<8}{time:<5}{time}{platform:<3}         TB\n")
}

pub fn intermediate(location: &str, arrival: &str, departure: &str, platform: &str) -> String {
    format!(
        "LI{location:<8}{arrival:<5}{departure:<5}{:5}{arrival}{departure}{platform:<3}      T\n",
        ""
    )
}

pub fn pass(location: &str, time: &str) -> String {
    format!("LI{location:<8}{:10}{time:<5}00000000   \n", "")
}

pub fn terminal(location: &str, time: &str, platform: &str) -> String {
    format!("LT{location:<8}{time:<5}{time}{platform:<3}    TF\n")
}

pub fn station_master(entries: &[(&str, &str, &str)]) -> String {
    let mut text =
        String::from("A                             FILE-SPEC=05 1.00 12/06/19 18.04.15   183\n");
    for (name, location, code) in entries {
        text.push_str(&station(name, location, code));
    }
    text
}
