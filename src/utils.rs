pub fn argmax<T: PartialOrd>(values: &[T]) -> usize {
    let mut max: &T = &values[0];
    let mut result: usize = 0;
    for (i, v) in values.iter().enumerate() {
        if v > max {
            max = v;
            result = i;
        }
    }
    result
}

pub fn moving_average(window: usize, vector: &[f64]) -> Vec<f64> {
    let mut aux: usize = 0;
    let mut result: Vec<f64> = vec![];
    while aux < vector.len() {
        let end: usize = if aux + window < vector.len() {
            aux + window
        } else {
            vector.len()
        };
        let slice: &[f64] = &vector[aux..end];
        let r: f64 = slice.iter().sum();
        result.push(r / window as f64);
        aux = end;
    }
    result
}
