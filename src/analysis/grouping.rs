use std::collections::HashMap;

/// Records sharing one key, in the order they appeared in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T> {
    pub key: String,
    pub records: Vec<T>,
}

/// Groups records by the selected key. Keys keep first-appearance order and
/// records keep their relative order inside each group.
pub fn group_by<T, F>(records: Vec<T>, key_of: F) -> Vec<Group<T>>
where
    F: Fn(&T) -> &str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<T>> = Vec::new();

    for record in records {
        let key = key_of(&record).to_string();
        match index.get(&key) {
            Some(&slot) => groups[slot].records.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    records: vec![record],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        player: &'static str,
        n: u32,
    }

    fn row(player: &'static str, n: u32) -> Row {
        Row { player, n }
    }

    #[test]
    fn empty_input_gives_no_groups() {
        let groups = group_by(Vec::<Row>::new(), |r| r.player);
        assert!(groups.is_empty());
    }

    #[test]
    fn keeps_key_and_record_order() {
        let rows = vec![row("Ana", 1), row("Bia", 2), row("Ana", 3), row("Caio", 4), row("Bia", 5)];
        let groups = group_by(rows, |r| r.player);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Ana", "Bia", "Caio"]);

        let ana: Vec<u32> = groups[0].records.iter().map(|r| r.n).collect();
        assert_eq!(ana, vec![1, 3]);
        let bia: Vec<u32> = groups[1].records.iter().map(|r| r.n).collect();
        assert_eq!(bia, vec![2, 5]);
    }

    #[test]
    fn groups_partition_the_input() {
        let rows: Vec<Row> = (0..40)
            .map(|n| row(["Ana", "Bia", "Caio", "Duda"][(n * 7 % 4) as usize], n))
            .collect();
        let groups = group_by(rows.clone(), |r| r.player);

        let total: usize = groups.iter().map(|g| g.records.len()).sum();
        assert_eq!(total, rows.len());

        for group in &groups {
            assert!(group.records.iter().all(|r| r.player == group.key));
        }

        let mut seen: Vec<u32> = groups
            .iter()
            .flat_map(|g| g.records.iter().map(|r| r.n))
            .collect();
        seen.sort();
        assert_eq!(seen, (0..40).collect::<Vec<_>>());
    }
}
